//! # Actus News
//!
//! Extraction of news-article listings from loosely structured CMS pages.
//!
//! A listing page is handed to an [`Extractor`], which tries three strategies
//! in order (listing cards, embedded JSON-LD, bare news links) and keeps the
//! first non-empty result. Every record is an [`Article`] with a non-empty
//! title, an absolute `http(s)` URL, a summary and an optional raw date.
//!
//! Around the extractor sit a retrying HTTP fetcher, a listing client with an
//! RSS/Atom fallback, a multi-page collector and HTML/JSON writers.
//!
//! ```no_run
//! use actus_news::extract_articles;
//! use url::Url;
//!
//! let base = Url::parse("https://actus.ulb.be").unwrap();
//! let html = std::fs::read_to_string("listing.html").unwrap();
//! for article in extract_articles(&html, &base).unwrap() {
//!     println!("{} -> {}", article.title(), article.url());
//! }
//! ```

pub mod client;
pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod utils;

pub use client::ListingClient;
pub use collect::{ListingSource, collect_articles};
pub use config::Config;
pub use error::{ClientError, CollectError, ConfigError, DetailParseError, FeedError, FetchError, ListingParseError};
pub use extract::{Extractor, Strategy, extract_articles};
pub use models::Article;
