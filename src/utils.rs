//! Text helpers shared by the extractors and the output writers.
//!
//! - Whitespace collapsing and entity decoding for scraped text
//! - Visible-text extraction for DOM elements
//! - HTML escaping for the export page
//! - String truncation for logging
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Collapse every run of whitespace into a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    RE_WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Normalize text coming from markup or embedded metadata.
///
/// Strings that still carry entity references or tags (JSON-LD values, feed
/// descriptions) are run through the HTML parser so that `&eacute;` becomes
/// `é` and `<p>` wrappers disappear. The result is whitespace-collapsed.
pub fn clean_text(s: &str) -> String {
    if s.contains('&') || s.contains('<') {
        let fragment = Html::parse_fragment(s);
        let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
        collapse_whitespace(&text)
    } else {
        collapse_whitespace(s)
    }
}

/// Visible text of an element, text nodes joined by a space and collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Escape the five HTML-significant characters for text and attribute use.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the parent directory of `path` exists and is writable.
///
/// The directory is created if missing, then a probe file is written and
/// removed again.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
