//! Runtime configuration.
//!
//! Settings come from built-in defaults, then an optional YAML file
//! (`--config`), then command-line flags, with later sources winning.
//!
//! ```yaml
//! location: "news articles"
//! url: "https://www.nbcnews.com/world"
//! storage: text            # text | memory
//! request_timeout_secs: 20
//! user_agent: "topic_news_sentiment/0.1"
//! format:
//!   remove_stop_words: false
//! ```

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::formatter::FormatSettings;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOCATION: &str = "news articles";
pub const DEFAULT_URL: &str = "https://www.nbcnews.com/world";

/// Which storage backend keeps the articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageKind {
    /// One text file per article under `<location>/<topic>/`.
    #[default]
    Text,
    /// Kept in memory for the lifetime of the process.
    Memory,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(StorageKind::Text),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(Error::UnsupportedStorage(s.to_string())),
        }
    }
}

impl TryFrom<String> for StorageKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Text => f.write_str("text"),
            StorageKind::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Root directory for text storage.
    pub location: PathBuf,
    /// Seed page articles are discovered from.
    pub url: String,
    pub storage: StorageKind,
    /// Per-request timeout for every page fetch.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub format: FormatSettings,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            location: PathBuf::from(DEFAULT_LOCATION),
            url: DEFAULT_URL.to_string(),
            storage: StorageKind::default(),
            request_timeout_secs: 20,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format: FormatSettings::default(),
        }
    }
}

impl NewsConfig {
    /// Load a YAML config file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&raw).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Build the effective config for a run from the parsed command line.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(location) = &cli.location {
            config.location = location.clone();
        }
        if let Some(url) = &cli.url {
            config.url = url.clone();
        }
        if let Some(storage) = &cli.storage {
            config.storage = storage.parse()?;
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_storage_kind_parsing() {
        assert_eq!("text".parse::<StorageKind>().unwrap(), StorageKind::Text);
        assert_eq!(" Memory ".parse::<StorageKind>().unwrap(), StorageKind::Memory);
    }

    #[test]
    fn test_unknown_storage_is_typed_error() {
        let err = "s3".parse::<StorageKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedStorage(ref s) if s == "s3"));
    }

    #[test]
    fn test_defaults() {
        let config = NewsConfig::default();
        assert_eq!(config.location, PathBuf::from("news articles"));
        assert_eq!(config.url, "https://www.nbcnews.com/world");
        assert_eq!(config.storage, StorageKind::Text);
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert!(!config.format.remove_stop_words);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
location: /tmp/articles
storage: memory
format:
  remove_stop_words: true
"#;
        let config = NewsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.location, PathBuf::from("/tmp/articles"));
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(config.format.remove_stop_words);
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.request_timeout_secs, 20);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(NewsConfig::from_yaml("  \n").unwrap(), NewsConfig::default());
    }

    #[test]
    fn test_yaml_with_unknown_storage_fails() {
        assert!(NewsConfig::from_yaml("storage: s3").is_err());
    }

    #[test]
    fn test_load_reports_path_on_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "request_timeout_secs: [not, a, number]").unwrap();

        let err = NewsConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "location: from-file\nurl: https://file.test/news\n").unwrap();

        let cli = Cli::parse_from([
            "topic_news_sentiment",
            "--config",
            path.to_str().unwrap(),
            "--url",
            "https://cli.test/world",
        ]);
        let config = NewsConfig::resolve(&cli).unwrap();

        assert_eq!(config.location, PathBuf::from("from-file"));
        assert_eq!(config.url, "https://cli.test/world");
    }

    #[test]
    fn test_cli_unknown_storage_is_rejected() {
        let cli = Cli::parse_from(["topic_news_sentiment", "--storage", "sqlite"]);
        assert!(matches!(
            NewsConfig::resolve(&cli),
            Err(Error::UnsupportedStorage(_))
        ));
    }
}
