//! Search response decoding
//!
//! The vendor's autocomplete endpoint answers with a Solr-style envelope.
//! Only the fields needed to build a [`ProductIdentity`] are decoded; the
//! rest of the payload is ignored.

use crate::client::FetchedDocument;
use crate::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A product in the vendor's catalog
///
/// The number is the vendor's internal article id and is what every other
/// lookup is keyed by. Fields are private so an identity can't change once
/// it has been handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductIdentity {
    #[serde(rename = "Number")]
    number: u64,

    #[serde(rename = "Description")]
    description: String,
}

impl ProductIdentity {
    pub fn new(number: u64, description: impl Into<String>) -> Self {
        Self {
            number,
            description: description.into(),
        }
    }

    /// An identity known only by its article number
    pub fn from_number(number: u64) -> Self {
        Self::new(number, String::new())
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The memoization key for this product
    pub fn cache_key(&self) -> String {
        self.number.to_string()
    }
}

impl fmt::Display for ProductIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "#{}", self.number)
        } else {
            write!(f, "#{} ({})", self.number, self.description)
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: ResponseField,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseField {
    #[serde(rename = "numFound", default)]
    num_found: u64,

    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "article_artid")]
    number: u64,

    #[serde(rename = "article_lang_besch", default)]
    description: String,
}

/// Decodes the raw JSON body of a search response
///
/// Records come back in the order the vendor ranked them.
///
/// # Errors
///
/// * `DecodeError::Json` - the body is not a well-formed search envelope
pub fn parse_search_response(body: &[u8]) -> Result<Vec<ProductIdentity>, DecodeError> {
    let envelope: SearchResponse = serde_json::from_slice(body)?;

    tracing::debug!(
        "Search response: {} found, {} returned",
        envelope.response.num_found,
        envelope.response.docs.len()
    );

    Ok(envelope
        .response
        .docs
        .into_iter()
        .map(|doc| ProductIdentity::new(doc.number, doc.description))
        .collect())
}

/// Decodes a fetched search document, rejecting non-success statuses
///
/// A failed search is never reported as "no results": both a bad status and
/// a malformed body surface as a [`DecodeError`].
pub fn decode_search(document: &FetchedDocument) -> Result<Vec<ProductIdentity>, DecodeError> {
    if !document.is_success() {
        return Err(DecodeError::SearchStatus {
            url: document.url.clone(),
            status: document.status,
        });
    }

    parse_search_response(&document.body)
}
