//! JSON dump of collected articles.
//!
//! The file holds a single array of `{title, url, summary, date}` objects in
//! collection order, pretty-printed for diffing between runs.

use crate::models::Article;
use crate::utils::ensure_writable_parent;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `articles` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles_json(path: &Path, articles: &[Article]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    if let Err(e) = ensure_writable_parent(path).await {
        error!(error = %e, "JSON output directory is not writable");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!("Wrote JSON file");
    Ok(())
}
