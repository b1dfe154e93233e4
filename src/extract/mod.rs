//! Extractors turning vendor documents into typed records
//!
//! - `part`: search JSON → product identities (fails on bad input)
//! - `price`: article page → price, `0.0` when unknown (never fails)
//! - `meta`: article page → specification table (never fails)
//! - `image`: JPEG bytes → decoded image (fails on bad input)
//!
//! All of them are pure functions over bytes or a parsed document.

mod image;
mod meta;
mod part;
mod price;

pub use self::image::{decode_jpeg, ImageBlob};
pub use meta::{
    extract_specifications, specifications_from_html, SpecificationGroup, SpecificationTable,
    DATASHEETS_GROUP, MANUFACTURER_KEY, MPN_KEY,
};
pub use part::{decode_search, parse_search_response, ProductIdentity};
pub use price::{extract_price, parse_price, price_from_html, CURRENCY_MARKER};

/// Compiles every selector the extractors use
///
/// Call once at startup so a broken selector constant panics there instead
/// of inside the first request.
pub fn compile_selectors() {
    let _ = &*price::PRICE;
    let _ = &*meta::META;
}
