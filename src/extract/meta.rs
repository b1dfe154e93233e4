//! Specification table extraction from article pages
//!
//! An article page lists its technical data as a series of property groups.
//! Each group has a headline followed by parallel name and value cells.
//! Datasheet links and the manufacturer block live elsewhere on the page.
//!
//! Extraction never fails. Groups that don't have the expected shape are
//! dropped, single unreadable cells are skipped, and a page without any
//! property group yields an empty table.

use crate::query::{direct_text, leaf_text, Query};
use scraper::Html;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Attribute name → attribute value within one group
pub type SpecificationGroup = HashMap<String, String>;

/// Group name → group contents
pub type SpecificationTable = HashMap<String, SpecificationGroup>;

/// Group holding datasheet title → URL, plus the manufacturer fields
pub const DATASHEETS_GROUP: &str = "datasheets";

/// Key of the manufacturer part number inside [`DATASHEETS_GROUP`]
pub const MPN_KEY: &str = "mpn";

/// Key of the manufacturer name inside [`DATASHEETS_GROUP`]
pub const MANUFACTURER_KEY: &str = "manufacturer";

/// Child offsets from a group node to its headline text
const HEADLINE_PATH: &[usize] = &[0, 0];

pub(crate) struct MetaQueries {
    pub group: Query,
    pub name: Query,
    pub value: Query,
    pub datasheet: Query,
    pub mpn: Query,
    pub manufacturer: Query,
}

pub(crate) static META: LazyLock<MetaQueries> = LazyLock::new(|| MetaQueries {
    group: Query::new(".av_propview"),
    name: Query::new(".av_propname"),
    value: Query::new(".av_propvalue"),
    datasheet: Query::new(".av_datasheet_description a"),
    mpn: Query::new("#av_articlemanufacturer > .av_fontnormal"),
    manufacturer: Query::new(r#"#av_articlemanufacturer > [itemprop="manufacturer"]"#),
});

/// Builds the specification table of a parsed article page
pub fn extract_specifications(document: &Html) -> SpecificationTable {
    let queries = &*META;
    let mut table = SpecificationTable::new();

    let groups = queries.group.match_all_in(document);
    if groups.is_empty() {
        tracing::debug!("No property groups on page");
        return table;
    }

    for group in groups {
        let Some(headline) = leaf_text(group, HEADLINE_PATH) else {
            tracing::debug!("Skipping property group without headline");
            continue;
        };

        let names = queries.name.match_all(group);
        let values = queries.value.match_all(group);

        if names.len() != values.len() {
            tracing::debug!(
                "Dropping group '{}': {} names vs {} values",
                headline,
                names.len(),
                values.len()
            );
            continue;
        }

        let entries = names
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| {
                let name = direct_text(name)?;
                let value = direct_text(value)?;
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();

        table.insert(headline.to_string(), entries);
    }

    let mut datasheets = extract_datasheets(document);

    // Manufacturer fields ride along in the datasheets group; consumers of
    // the JSON output look for them there.
    if let Some(mpn) = queries.mpn.match_first_in(document).and_then(direct_text) {
        datasheets.insert(MPN_KEY.to_string(), mpn.to_string());
    }

    if let Some(manufacturer) = queries
        .manufacturer
        .match_first_in(document)
        .and_then(direct_text)
    {
        datasheets.insert(MANUFACTURER_KEY.to_string(), manufacturer.to_string());
    }

    table.insert(DATASHEETS_GROUP.to_string(), datasheets);
    table
}

/// Collects datasheet title → link target
fn extract_datasheets(document: &Html) -> SpecificationGroup {
    let mut datasheets = SpecificationGroup::new();

    for link in META.datasheet.match_all_in(document) {
        let Some(title) = direct_text(link) else {
            continue;
        };

        match link.value().attr("href") {
            Some(href) if !href.is_empty() => {
                datasheets.insert(title.to_string(), href.to_string());
            }
            _ => tracing::debug!("Datasheet '{}' has no link target", title),
        }
    }

    datasheets
}

/// Parses `html` and builds its specification table
pub fn specifications_from_html(html: &str) -> SpecificationTable {
    extract_specifications(&Html::parse_document(html))
}
