//! reichelt-api: product data extraction for reichelt.de
//!
//! This crate turns the vendor's search JSON and article pages into typed
//! records (identities, prices, specification tables, images) and memoizes
//! them per product with a per-kind freshness policy.

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod extract;
pub mod query;
pub mod server;

use thiserror::Error;

/// Main error type for reichelt-api operations
#[derive(Debug, Error)]
pub enum ReicheltError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the vendor
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid vendor URL: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised when a fetched payload cannot be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed search response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Search request for {url} answered with status {status}")]
    SearchStatus { url: String, status: u16 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for reichelt-api operations
pub type Result<T> = std::result::Result<T, ReicheltError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{CacheKind, Expiry, MemoStore};
pub use catalog::Catalog;
pub use client::VendorSession;
pub use config::Config;
pub use extract::{ImageBlob, ProductIdentity, SpecificationTable};
