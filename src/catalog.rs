//! Product lookups backed by the memoization store
//!
//! Every lookup consults the store first and only fetches from the vendor
//! on a miss. Identity search and image retrieval report failures; price and
//! specification extraction degrade to `0.0` / partial tables instead.

use crate::cache::{CacheKind, CachedValue, MemoStore};
use crate::client::VendorSession;
use crate::extract::{
    decode_jpeg, decode_search, extract_price, extract_specifications, ImageBlob,
    ProductIdentity, SpecificationTable,
};
use crate::Result;
use scraper::Html;
use std::sync::Arc;

/// Vendor lookups with memoization
#[derive(Debug, Clone)]
pub struct Catalog {
    session: VendorSession,
    cache: Arc<MemoStore>,
}

impl Catalog {
    /// Creates a catalog over an open session and a shared store
    pub fn new(session: VendorSession, cache: Arc<MemoStore>) -> Self {
        Self { session, cache }
    }

    pub fn cache(&self) -> &Arc<MemoStore> {
        &self.cache
    }

    /// Searches the vendor catalog for `query`
    ///
    /// Hits are returned in the vendor's ranking order and remembered as
    /// identities, so a later [`Catalog::get_identity`] can resolve them.
    ///
    /// # Errors
    ///
    /// * `ReicheltError::Fetch` - the search endpoint could not be reached
    /// * `ReicheltError::Decode` - the search answered with a non-success
    ///   status or a malformed body
    pub async fn find_identities(&self, query: &str) -> Result<Vec<ProductIdentity>> {
        let url = self.session.search_url(query)?;
        let document = self.session.fetch(&url).await?;
        let parts = decode_search(&document)?;

        tracing::info!("Search '{}' returned {} parts", query, parts.len());

        for part in &parts {
            self.cache
                .insert(part.cache_key(), CachedValue::Identity(part.clone()));
        }

        Ok(parts)
    }

    /// A previously seen identity for an article number
    pub fn get_identity(&self, number: u64) -> Option<ProductIdentity> {
        match self.cache.get(CacheKind::Identity, &number.to_string()) {
            Some(CachedValue::Identity(part)) => Some(part),
            _ => None,
        }
    }

    /// The current price of `part`, `0.0` if it can't be determined
    pub async fn get_price(&self, part: &ProductIdentity) -> f32 {
        let key = part.cache_key();
        if let Some(CachedValue::Price(price)) = self.cache.get(CacheKind::Price, &key) {
            tracing::debug!("Price cache hit for {}", part);
            return price;
        }

        let price = self.fetch_price(part).await;
        self.cache.insert(key, CachedValue::Price(price));
        price
    }

    async fn fetch_price(&self, part: &ProductIdentity) -> f32 {
        let document = match self.session.article_url(part) {
            Ok(url) => self.session.fetch(&url).await,
            Err(e) => Err(e),
        };

        match document {
            Ok(document) if document.is_success() => {
                extract_price(&Html::parse_document(&document.text()))
            }
            Ok(document) => {
                tracing::debug!("Price page for {} answered {}", part, document.status);
                0.0
            }
            Err(e) => {
                tracing::debug!("Price fetch for {} failed: {}", part, e);
                0.0
            }
        }
    }

    /// The specification table of `part`
    ///
    /// # Errors
    ///
    /// * `ReicheltError::Fetch` - the article page could not be fetched or
    ///   answered with a non-success status
    pub async fn get_specifications(
        &self,
        part: &ProductIdentity,
    ) -> Result<Arc<SpecificationTable>> {
        let key = part.cache_key();
        if let Some(CachedValue::Meta(table)) = self.cache.get(CacheKind::Meta, &key) {
            tracing::debug!("Metadata cache hit for {}", part);
            return Ok(table);
        }

        let url = self.session.article_url(part)?;
        let document = self.session.fetch(&url).await?.require_success()?;
        let table = Arc::new(extract_specifications(&Html::parse_document(
            &document.text(),
        )));

        tracing::debug!("Extracted {} groups for {}", table.len(), part);

        self.cache.insert(key, CachedValue::Meta(table.clone()));
        Ok(table)
    }

    /// The product image of `part`, resized by the vendor to fit
    /// `width` x `height`
    ///
    /// # Errors
    ///
    /// * `ReicheltError::Fetch` - the image could not be fetched or answered
    ///   with a non-success status
    /// * `ReicheltError::Decode` - the payload is not a JPEG
    pub async fn get_image(
        &self,
        part: &ProductIdentity,
        width: u32,
        height: u32,
    ) -> Result<Arc<ImageBlob>> {
        let key = format!("{}@{}x{}", part.cache_key(), width, height);
        if let Some(CachedValue::Image(blob)) = self.cache.get(CacheKind::Image, &key) {
            tracing::debug!("Image cache hit for {}", part);
            return Ok(blob);
        }

        let url = self.session.image_url(part, width, height)?;
        let document = self.session.fetch(&url).await?.require_success()?;
        let blob = Arc::new(decode_jpeg(&document.body)?);

        tracing::debug!(
            "Decoded {}x{} image for {}",
            blob.width(),
            blob.height(),
            part
        );

        self.cache.insert(key, CachedValue::Image(blob.clone()));
        Ok(blob)
    }
}
