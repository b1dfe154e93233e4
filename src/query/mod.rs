//! Tree query helpers shared by the HTML extractors
//!
//! Selectors in this crate are fixed constants. A selector that fails to
//! compile is a programmer error and panics the first time it is touched;
//! `extract::compile_selectors` forces every selector at startup so that
//! happens before the first request. Matching never fails: a tree without
//! the expected structure simply yields no matches.

use scraper::{ElementRef, Html, Selector};

/// A compiled CSS selector together with its source text
#[derive(Debug)]
pub struct Query {
    css: &'static str,
    selector: Selector,
}

impl Query {
    /// Compiles a selector constant
    ///
    /// # Panics
    ///
    /// Panics if `css` is not a valid selector.
    pub fn new(css: &'static str) -> Self {
        let selector = Selector::parse(css).expect("selector constant must compile");
        Self { css, selector }
    }

    /// The selector source this query was compiled from
    pub fn css(&self) -> &'static str {
        self.css
    }

    /// All matches below `root`, in document order
    pub fn match_all<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        root.select(&self.selector).collect()
    }

    /// The first match below `root` in document order
    pub fn match_first<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        root.select(&self.selector).next()
    }

    /// All matches in a whole document
    pub fn match_all_in<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.match_all(document.root_element())
    }

    /// The first match in a whole document
    pub fn match_first_in<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.match_first(document.root_element())
    }
}

/// Reads the text node found by walking `path` child indices down from `node`
///
/// `path` counts every child node, text and comments included, so
/// `&[0, 0]` is "first child of first child". Returns `None` when a step is
/// missing or the node at the end of the path is not text.
pub fn leaf_text<'a>(node: ElementRef<'a>, path: &[usize]) -> Option<&'a str> {
    let mut current = *node;
    for &index in path {
        current = current.children().nth(index)?;
    }
    current.value().as_text().map(|text| &**text)
}

/// The element's own text: its first child, when that child is a text node
pub fn direct_text(node: ElementRef<'_>) -> Option<&str> {
    leaf_text(node, &[0])
}
