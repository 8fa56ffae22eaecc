//! Listing client: retrieval plus extraction for one site.
//!
//! Each listing page is fetched and handed to the [`Extractor`]. When no
//! strategy recognizes the page, the client looks for an advertised RSS/Atom
//! feed and uses it instead.

use crate::collect::ListingSource;
use crate::config::Config;
use crate::error::{ClientError, FetchError};
use crate::extract::Extractor;
use crate::extract::detail::parse_article_detail;
use crate::extract::feed::{find_rss_feed_url, parse_rss_feed};
use crate::fetch::{FetchAsync, HttpFetcher, RetryFetch};
use crate::models::Article;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Article pages fetched at once by [`ListingClient::article_details`].
pub const DETAIL_CONCURRENCY: usize = 4;

pub struct ListingClient<F> {
    fetcher: F,
    extractor: Extractor,
    listing_url: Url,
    page_size: usize,
}

impl ListingClient<RetryFetch<HttpFetcher>> {
    /// HTTP client with retries, built from the configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = HttpFetcher::new(&config.user_agent, Duration::from_secs(config.timeout_secs))?;
        let fetcher = RetryFetch::new(http, config.max_retries, Duration::from_millis(500));
        Self::with_fetcher(fetcher, config)
    }
}

impl<F> ListingClient<F>
where
    F: FetchAsync,
{
    /// Client over any [`FetchAsync`] implementation.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieval backend, usually a [`RetryFetch`] in production
    ///   and an in-memory fake in tests
    /// * `config` - Supplies the base URL, listing path and page size
    ///
    /// # Errors
    ///
    /// [`ClientError::Config`] when the base URL or listing path is invalid.
    pub fn with_fetcher(fetcher: F, config: &Config) -> Result<Self, ClientError> {
        let base = config.base()?;
        let listing_url = config.listing_url()?;
        Ok(Self {
            fetcher,
            extractor: Extractor::new(base),
            listing_url,
            page_size: config.page_size,
        })
    }

    /// Override the number of articles kept per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Number of articles kept per listing page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Origin used to resolve article links.
    pub fn base(&self) -> &Url {
        self.extractor.base()
    }

    /// Listing URL for a zero-based page; the first page has no query.
    pub fn listing_url(&self, page: usize) -> Url {
        let mut url = self.listing_url.clone();
        if page > 0 {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        url
    }

    /// Articles of a zero-based listing page, at most `page_size` of them.
    ///
    /// When the HTML strategies find nothing, the feed advertised in the page
    /// head is fetched and parsed instead.
    ///
    /// # Errors
    ///
    /// * [`ClientError::Fetch`] when the listing page cannot be retrieved.
    /// * [`ClientError::Listing`] when neither the page nor its feed yields
    ///   an article.
    pub async fn listing_articles(&self, page: usize) -> Result<Vec<Article>, ClientError> {
        self.listing_page(page, self.page_size).await
    }

    /// Fetch an article page and return its readable paragraphs.
    #[instrument(level = "info", skip(self))]
    pub async fn article_detail(&self, url: &str) -> Result<String, ClientError> {
        let url = self.base().join(url).map_err(FetchError::from)?;
        let html = self.fetcher.fetch(&url).await?;
        Ok(parse_article_detail(&html)?)
    }

    /// Fetch several article pages concurrently, results in input order.
    ///
    /// Failures are reported per URL and never abort the batch.
    #[instrument(level = "info", skip_all, fields(count = urls.len()))]
    pub async fn article_details(&self, urls: &[String]) -> Vec<(String, Result<String, ClientError>)> {
        stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let detail = self.article_detail(&url).await;
                if let Err(e) = &detail {
                    warn!(error = %e, %url, "Article fetch failed");
                }
                (url, detail)
            })
            .buffered(DETAIL_CONCURRENCY)
            .collect()
            .await
    }

    /// Articles advertised through the page's RSS/Atom feed, if any.
    async fn feed_articles(&self, html: &str) -> Result<Vec<Article>, ClientError> {
        let Some(feed_url) = find_rss_feed_url(html, self.base()) else {
            return Ok(Vec::new());
        };
        info!(%feed_url, "Falling back to advertised feed");
        let feed_url = Url::parse(&feed_url).map_err(FetchError::from)?;
        let xml = self.fetcher.fetch(&feed_url).await?;
        Ok(parse_rss_feed(&xml, self.base())?)
    }
}

impl<F> ListingSource for ListingClient<F>
where
    F: FetchAsync,
{
    #[instrument(level = "info", skip(self))]
    async fn listing_page(&self, page: usize, page_size: usize) -> Result<Vec<Article>, ClientError> {
        let url = self.listing_url(page);
        let html = self.fetcher.fetch(&url).await?;

        let mut articles = match self.extractor.extract(&html) {
            Ok(articles) => articles,
            Err(listing_error) => {
                let from_feed = match self.feed_articles(&html).await {
                    Ok(articles) => articles,
                    Err(e) => {
                        warn!(error = %e, "Feed fallback failed");
                        Vec::new()
                    }
                };
                if from_feed.is_empty() {
                    return Err(listing_error.into());
                }
                from_feed
            }
        };

        articles.truncate(page_size);
        info!(count = articles.len(), %url, "Listing page parsed");
        Ok(articles)
    }
}
