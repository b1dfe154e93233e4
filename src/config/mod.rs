//! Configuration module for reichelt-api
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use reichelt_api::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("reichelt.toml")).unwrap();
//! println!("Dispatcher will bind to: {}", config.server.addr);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ServerConfig, VendorConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
