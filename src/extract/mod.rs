//! Article extraction from listing pages.
//!
//! Listing markup drifts between themes and over time, so extraction is a
//! chain of independent strategies tried in a fixed order. The first one that
//! produces any article wins; its results are never merged with another's.
//!
//! | Order | Strategy | Looks at |
//! |-------|----------|----------|
//! | 1 | [`CardStrategy`] | Card nodes inside known listing containers |
//! | 2 | [`StructuredDataStrategy`] | `application/ld+json` blocks |
//! | 3 | [`LinkFallbackStrategy`] | Any anchor whose href has a news path |
//!
//! Every strategy recovers summaries and dates through the ancestor walk in
//! [`fields`]. The same markup always yields the same articles in the same
//! order: there is no shared state, clock or randomness involved.
//!
//! The module also hosts the parsers the listing client falls back to or
//! uses for single articles: [`feed`] (RSS/Atom) and [`detail`].

pub mod cards;
pub mod detail;
pub mod feed;
pub mod fields;
pub mod links;
pub mod structured;

pub use cards::CardStrategy;
pub use links::LinkFallbackStrategy;
pub use structured::StructuredDataStrategy;

use crate::error::ListingParseError;
use crate::models::Article;
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

/// One self-contained heuristic for locating articles in a document.
///
/// Implementations absorb per-candidate problems themselves and return an
/// empty list when they find nothing.
pub trait Strategy {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Candidates found in `document`, relative hrefs resolved on `base`.
    fn try_extract(&self, document: &Html, base: &Url) -> Vec<Article>;
}

/// Runs strategies in order and returns the first non-empty result.
pub struct Extractor {
    base: Url,
    strategies: Vec<Box<dyn Strategy + Send + Sync>>,
}

impl Extractor {
    /// Extractor with the default chain: cards, structured data, links.
    pub fn new(base: Url) -> Self {
        Self {
            base,
            strategies: vec![
                Box::new(CardStrategy),
                Box::new(StructuredDataStrategy),
                Box::new(LinkFallbackStrategy),
            ],
        }
    }

    /// Extractor with no strategy; add them with [`Extractor::with_strategy`].
    pub fn empty(base: Url) -> Self {
        Self {
            base,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy after the existing ones.
    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: Strategy + Send + Sync + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Origin that relative hrefs are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Extract the articles of one listing page.
    ///
    /// The document is parsed once and handed to each strategy in turn.
    /// The first non-empty result is deduplicated by URL and returned as-is;
    /// later strategies are not consulted.
    ///
    /// # Arguments
    ///
    /// * `markup` - Full HTML of the listing page
    ///
    /// # Returns
    ///
    /// The articles of the winning strategy, in discovery order.
    ///
    /// # Errors
    ///
    /// [`ListingParseError`] when no strategy finds anything.
    #[instrument(level = "debug", skip_all, fields(bytes = markup.len()))]
    pub fn extract(&self, markup: &str) -> Result<Vec<Article>, ListingParseError> {
        let document = Html::parse_document(markup);

        for strategy in &self.strategies {
            let articles = strategy.try_extract(&document, &self.base);
            if articles.is_empty() {
                debug!(strategy = strategy.name(), "Strategy found nothing");
                continue;
            }

            let articles: Vec<Article> = articles
                .into_iter()
                .unique_by(|a| a.url().to_string())
                .collect();
            debug!(strategy = strategy.name(), count = articles.len(), "Strategy matched");
            return Ok(articles);
        }

        Err(ListingParseError)
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Extractor")
            .field("base", &self.base.as_str())
            .field("strategies", &names)
            .finish()
    }
}

/// Extract articles from `markup` with the default strategy chain.
///
/// Shorthand for `Extractor::new(base.clone()).extract(markup)`.
///
/// # Arguments
///
/// * `markup` - Full HTML of the listing page
/// * `base` - Origin used to resolve relative hrefs
///
/// # Errors
///
/// [`ListingParseError`] when none of the strategies finds an article.
pub fn extract_articles(markup: &str, base: &Url) -> Result<Vec<Article>, ListingParseError> {
    Extractor::new(base.clone()).extract(markup)
}
