//! Runtime configuration.
//!
//! Values come from an optional YAML file; every field has a default so an
//! empty or partial file is valid. The CLI may override the base URL.
//!
//! ```yaml
//! base_url: https://actus.ulb.be
//! list_path: /fr/toutes-les-actus
//! page_size: 10
//! timeout_secs: 10
//! max_retries: 3
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://actus.ulb.be";
pub const DEFAULT_LIST_PATH: &str = "/fr/toutes-les-actus";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin used to resolve relative article links.
    pub base_url: String,
    /// Path of the listing page, relative to `base_url`.
    pub list_path: String,
    /// Maximum number of articles kept per listing page.
    pub page_size: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries after the first failed request.
    pub max_retries: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: DEFAULT_LIST_PATH.to_string(),
            page_size: 10,
            timeout_secs: 10,
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load a YAML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Yaml`]
    /// if it is not valid YAML, [`ConfigError::InvalidUrl`] if `base_url`
    /// does not parse.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&raw)?;
        info!(base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.base()?;
        Ok(config)
    }

    /// The base origin as a parsed URL.
    pub fn base(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// The listing page URL.
    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        Ok(self.base()?.join(&self.list_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://actus.ulb.be");
        assert_eq!(
            config.listing_url().unwrap().as_str(),
            "https://actus.ulb.be/fr/toutes-les-actus"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("page_size: 25\nmax_retries: 0\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.list_path, DEFAULT_LIST_PATH);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("   \n").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = Config::from_yaml("base_url: not a url\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let err = Config::from_yaml("page_size: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: https://example.org\nlist_path: /news").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.listing_url().unwrap().as_str(), "https://example.org/news");
    }
}
