//! Error types for extraction, retrieval and collection.
//!
//! Per-candidate problems (a card without a title, an unparseable JSON-LD
//! block) never show up here: the extractors drop the candidate and move on.
//! Only whole-page outcomes become errors.

use thiserror::Error;

/// No extraction strategy recognized any article markup on the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no recognizable article markup found in listing page")]
pub struct ListingParseError;

/// An article page could not be turned into readable text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailParseError {
    #[error("article content not found")]
    ContentNotFound,

    #[error("article body appears to be empty")]
    EmptyBody,
}

/// An RSS/Atom document could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("failed to parse feed: {0}")]
    Parse(String),
}

impl FeedError {
    /// Wrap any reader error as a [`FeedError::Parse`].
    pub fn parse(err: impl std::fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// Transport failures from the retrieval layer.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors from the listing client, which combines retrieval and parsing.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Listing(#[from] ListingParseError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Detail(#[from] DetailParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from multi-page collection.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("no article could be retrieved from the site")]
    Listing(#[from] ListingParseError),

    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for CollectError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Listing(e) => CollectError::Listing(e),
            other => CollectError::Client(other),
        }
    }
}

/// Errors while loading the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
