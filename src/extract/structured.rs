//! JSON-LD (`application/ld+json`) blocks as an article source.
//!
//! Payloads are unwrapped recursively, so `@graph` arrays, `ItemList`s and
//! nested `item` objects are all reached. Objects that declare a `@type`
//! must declare one of [`ALLOWED_TYPES`]; objects without `@type` are
//! accepted as long as they carry a URL and a title.

use super::Strategy;
use crate::models::Article;
use crate::utils::{clean_text, truncate_for_log};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

const ALLOWED_TYPES: &[&str] = &["newsarticle", "article", "creativework", "listitem"];

const URL_KEYS: &[&str] = &["url", "mainEntityOfPage", "@id"];
const TITLE_KEYS: &[&str] = &["headline", "name", "title"];
const SUMMARY_KEYS: &[&str] = &["description", "abstract", "alternativeHeadline"];
const DATE_KEYS: &[&str] = &["datePublished", "dateCreated", "dateModified", "uploadDate"];

static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid json-ld selector")
});

/// Reads articles out of embedded structured data.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredDataStrategy;

impl Strategy for StructuredDataStrategy {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    #[instrument(level = "debug", skip_all, fields(strategy = "structured-data"))]
    fn try_extract(&self, document: &Html, base: &Url) -> Vec<Article> {
        let mut seen = HashSet::new();
        let mut articles = Vec::new();

        for script in document.select(&JSON_LD) {
            let raw = script.text().collect::<String>();
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let value = match serde_json::from_str::<Value>(raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!(error = %e, payload = %truncate_for_log(raw, 120), "Skipping malformed JSON-LD block");
                    continue;
                }
            };

            let mut candidates = Vec::new();
            collect_candidates(&value, base, &mut candidates);
            for article in candidates {
                if seen.insert(article.url().to_string()) {
                    articles.push(article);
                }
            }
        }

        articles
    }
}

/// Depth-first walk over a JSON-LD value, object keys in document order.
/// Accepted objects are not descended into; everything else is.
fn collect_candidates(value: &Value, base: &Url, out: &mut Vec<Article>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_candidates(item, base, out);
            }
        }
        Value::Object(map) => {
            if let Some(article) = article_from_object(map, base) {
                out.push(article);
                return;
            }
            for child in map.values() {
                collect_candidates(child, base, out);
            }
        }
        _ => {}
    }
}

fn article_from_object(map: &Map<String, Value>, base: &Url) -> Option<Article> {
    if !has_allowed_type(map.get("@type")) {
        return None;
    }

    // JSON-LD strings may still carry entities and inline markup.
    let href = first_string(map, URL_KEYS)?;
    let title = clean_text(&first_string(map, TITLE_KEYS)?);
    let summary = first_string(map, SUMMARY_KEYS).map(|s| clean_text(&s)).unwrap_or_default();
    let date = first_string(map, DATE_KEYS).map(|s| clean_text(&s));

    Article::new(&title, &href, &summary, date.as_deref(), base)
}

/// A missing `@type` is accepted. A declared one must match the allow-list.
fn has_allowed_type(node_type: Option<&Value>) -> bool {
    let is_allowed = |s: &str| ALLOWED_TYPES.contains(&s.to_ascii_lowercase().as_str());
    match node_type {
        None => true,
        Some(Value::String(s)) => is_allowed(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(is_allowed),
        Some(_) => false,
    }
}

/// First key whose value is a non-empty string, or an object carrying one
/// under `@id`/`url` (the shape `mainEntityOfPage` usually takes).
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(inner) => ["@id", "url"].iter().find_map(|k| {
            inner
                .get(*k)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }),
        _ => None,
    })
}
