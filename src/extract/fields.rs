//! Summary and date lookups shared by every strategy.
//!
//! Listing markup rarely keeps the teaser and the date inside the same node as
//! the title link, so both lookups start at the given node and climb through
//! its ancestors until something matches or [`MAX_ANCESTOR_DEPTH`] hops have
//! been made.

use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// Number of parent hops allowed above the starting node.
pub const MAX_ANCESTOR_DEPTH: usize = 5;

static SUMMARY_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    parse_all(&[
        "div.field--name-field-introduction",
        ".card__summary",
        ".node__teaser",
        ".c-card__summary",
        ".resume",
        ".summary",
        ".teaser",
        "p",
    ])
});

static DATE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    parse_all(&[
        "time",
        ".date--debut",
        ".card__date",
        ".c-card__date",
        ".node__date",
        ".date",
        "[class*=\"date\"]",
    ])
});

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).expect("valid field selector"))
        .collect()
}

/// Find the teaser text belonging to `node`.
///
/// Matches equal to `exclude_text` (normally the title) are skipped. Returns
/// an empty string when nothing is found within the depth budget.
pub fn extract_summary(node: ElementRef<'_>, exclude_text: &str) -> String {
    walk_ancestors(node, &SUMMARY_SELECTORS, |text| text != exclude_text).unwrap_or_default()
}

/// Find the raw publication date text belonging to `node`.
pub fn extract_date(node: ElementRef<'_>) -> Option<String> {
    walk_ancestors(node, &DATE_SELECTORS, |_| true)
}

/// Try every selector (in order) inside the current node, then move one
/// level up. The first non-empty text accepted by `accept` wins.
fn walk_ancestors<F>(node: ElementRef<'_>, selectors: &[Selector], accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let mut current = Some(node);
    let mut depth = 0;

    while let Some(element) = current {
        for selector in selectors {
            for candidate in element.select(selector) {
                let text = element_text(candidate);
                if !text.is_empty() && accept(&text) {
                    return Some(text);
                }
            }
        }

        if depth == MAX_ANCESTOR_DEPTH {
            break;
        }
        current = element.parent().and_then(ElementRef::wrap);
        depth += 1;
    }

    None
}
