//! Page retrieval with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait, one URL in, page body out
//! - [`HttpFetcher`]: `reqwest` implementation with user agent and timeout
//! - [`RetryFetch`]: decorator adding retries to any [`FetchAsync`]
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at the configured base delay
//! - Delay capped at 10 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::error::FetchError;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Async retrieval of a page body.
pub trait FetchAsync {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Plain HTTP GET through a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the underlying `reqwest::Client`.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Sent with every request
    /// * `timeout` - Per-request timeout, connect included
    ///
    /// # Errors
    ///
    /// [`FetchError::Http`] if the TLS backend cannot be initialized.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched page");
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchAsync`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    /// Wrap `inner`, retrying up to `max_retries` times after the first failure.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "info", skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_total = total_t0.elapsed().as_millis() as u64;

                    if attempt > self.max_retries {
                        error!(attempt, max = self.max_retries, elapsed_ms_total, error = %e, "fetch() exhausted retries");
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(attempt, max = self.max_retries, elapsed_ms_total, ?delay, error = %e, "fetch() attempt failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}
