//! Data model for extracted listing entries.
//!
//! [`Article`] is the single record type produced by every extraction path
//! (listing cards, JSON-LD, link fallback, RSS). It is built once through
//! [`Article::new`], which enforces the record invariants, and never mutated
//! afterwards.

use crate::utils::collapse_whitespace;
use serde::Serialize;
use url::Url;

/// A news entry discovered on a listing page.
///
/// # Invariants
///
/// * `title` is non-empty, entity-decoded and whitespace-collapsed.
/// * `url` is an absolute `http`/`https` URL.
/// * `summary` may be empty but is never equal to `title`.
/// * `date` is the raw date text found next to the entry, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    title: String,
    url: String,
    summary: String,
    date: Option<String>,
}

impl Article {
    /// Build an article from scraped values.
    ///
    /// Text arguments must already be decoded: DOM text as returned by the
    /// HTML parser, or raw metadata passed through
    /// [`clean_text`](crate::utils::clean_text). Only whitespace is
    /// normalized here, so a literal `<` or `&` in a title survives.
    ///
    /// # Arguments
    ///
    /// * `title` - Visible title text
    /// * `href` - Link target, resolved against `base`
    /// * `summary` - Teaser text, may be empty
    /// * `date` - Raw date text, if any
    /// * `base` - Origin of the listing page
    ///
    /// # Returns
    ///
    /// `None` when the title is blank, the href is empty or unresolvable, or
    /// the resolved URL is not `http(s)`.
    pub fn new(
        title: &str,
        href: &str,
        summary: &str,
        date: Option<&str>,
        base: &Url,
    ) -> Option<Self> {
        let title = collapse_whitespace(title);
        if title.is_empty() {
            return None;
        }

        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let url = base.join(href).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let mut summary = collapse_whitespace(summary);
        if summary == title {
            summary.clear();
        }

        let date = date.map(collapse_whitespace).filter(|d| !d.is_empty());

        Some(Self {
            title,
            url: url.to_string(),
            summary,
            date,
        })
    }

    /// Title text, never empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute `http(s)` URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Teaser text, empty when none was found.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Date text as it appeared next to the entry.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}
