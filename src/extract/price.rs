//! Price extraction from article pages
//!
//! Price lookups are best effort. Anything that goes wrong, from a missing
//! node to an unparseable number, yields `0.0`, which callers read as
//! "price unknown".

use crate::query::{direct_text, Query};
use scraper::Html;
use std::sync::LazyLock;

/// Marks the end of the amount in the price node's text
pub const CURRENCY_MARKER: &str = " €";

pub(crate) static PRICE: LazyLock<Query> = LazyLock::new(|| Query::new("#av_price"));

/// Parses a German-formatted price such as `"12,34 €"`
///
/// Only the text in front of [`CURRENCY_MARKER`] is considered and only the
/// first comma is treated as the decimal separator. Returns `0.0` when the
/// marker is missing, the amount is empty or does not parse, or the result
/// is negative or not finite.
///
/// # Example
///
/// ```
/// use reichelt_api::extract::parse_price;
///
/// assert_eq!(parse_price("0,07 € *"), 0.07);
/// assert_eq!(parse_price("ask us"), 0.0);
/// ```
pub fn parse_price(text: &str) -> f32 {
    let Some(end) = text.find(CURRENCY_MARKER) else {
        return 0.0;
    };

    let amount = text[..end].trim().replacen(',', ".", 1);
    match amount.parse::<f32>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Extracts the article price from a parsed page, `0.0` if it can't
pub fn extract_price(document: &Html) -> f32 {
    let Some(node) = PRICE.match_first_in(document) else {
        tracing::debug!("No {} node on page", PRICE.css());
        return 0.0;
    };

    match direct_text(node) {
        Some(text) => parse_price(text),
        None => {
            tracing::debug!("Price node has no text");
            0.0
        }
    }
}

/// Parses `html` and extracts the article price
pub fn price_from_html(html: &str) -> f32 {
    extract_price(&Html::parse_document(html))
}
