//! Vendor client
//!
//! The session here is the only part of the crate that does network I/O.
//! Extractors receive what it fetched and never talk to the vendor
//! themselves.

mod fetcher;

pub use fetcher::{build_http_client, FetchedDocument, VendorSession, MAX_IMAGE_SIZE};
