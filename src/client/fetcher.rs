//! HTTP access to the vendor
//!
//! This module handles all vendor requests, including:
//! - Building the HTTP client (user agent, timeouts, cookie jar)
//! - Priming the session cookie against the index page
//! - Building the search, article and image URLs
//! - GET requests returning status and raw body

use crate::config::{HttpConfig, VendorConfig};
use crate::extract::ProductIdentity;
use crate::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Resize target that yields the largest image the vendor will produce
pub const MAX_IMAGE_SIZE: (u32, u32) = (99999, 9999);

/// A fetched document: raw body plus the status it came with
///
/// The status is not judged here; each extractor decides what a
/// non-success status means for it.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Requested URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl FetchedDocument {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Fails with `FetchError::Status` unless the status is a success
    pub fn require_success(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps a cookie jar; the vendor ties searches and article
/// pages to a session cookie handed out on the first request.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// An HTTP session with the vendor
#[derive(Debug, Clone)]
pub struct VendorSession {
    client: Client,
    base: Url,
}

impl VendorSession {
    /// Creates a session without contacting the vendor
    pub fn new(vendor: &VendorConfig, http: &HttpConfig) -> Result<Self, FetchError> {
        let mut base = Url::parse(&vendor.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: build_http_client(http)?,
            base,
        })
    }

    /// Creates a session and primes the session cookie
    ///
    /// # Errors
    ///
    /// * `FetchError::Http` - the index page could not be reached
    /// * `FetchError::Status` - the index page did not answer 200
    pub async fn connect(vendor: &VendorConfig, http: &HttpConfig) -> Result<Self, FetchError> {
        let session = Self::new(vendor, http)?;
        let index = session.index_url()?;

        tracing::info!("Opening vendor session at {}", index);
        let document = session.fetch(&index).await?;
        if document.status != StatusCode::OK.as_u16() {
            return Err(FetchError::Status {
                url: document.url,
                status: document.status,
            });
        }

        Ok(session)
    }

    /// `{base}/index.html`
    pub fn index_url(&self) -> Result<Url, FetchError> {
        Ok(self.base.join("index.html")?)
    }

    /// Search endpoint for a free-text term
    pub fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = self.index_url()?;
        url.query_pairs_mut()
            .append_pair("ACTION", "514")
            .append_pair("id", "8")
            .append_pair("term", query);
        Ok(url)
    }

    /// Article page carrying price and specification data
    pub fn article_url(&self, part: &ProductIdentity) -> Result<Url, FetchError> {
        let mut url = self.index_url()?;
        url.query_pairs_mut()
            .append_pair("ACTION", "3")
            .append_pair("ARTICLE", &part.number().to_string());
        Ok(url)
    }

    /// Product image resized to fit `width` x `height`
    pub fn image_url(
        &self,
        part: &ProductIdentity,
        width: u32,
        height: u32,
    ) -> Result<Url, FetchError> {
        let path = format!("artimage/resize_{}x{}/{}", width, height, part.number());
        Ok(self.base.join(&path)?)
    }

    /// GETs `url` and returns status plus body
    ///
    /// Only transport failures are errors; any HTTP status is returned as is.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("{} answered {} ({} bytes)", url, status, body.len());

        Ok(FetchedDocument {
            url: url.to_string(),
            status,
            body: body.to_vec(),
        })
    }
}
