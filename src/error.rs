//! Error types shared by the store, scrapers, and sentiment pipeline.
//!
//! Capacity exhaustion and individual fetch failures are not errors: the
//! store silently drops saves past the cap, and the scrapers turn fetch
//! failures into [`FetchOutcome::Failed`](crate::models::FetchOutcome).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported storage type: {0:?} (expected \"text\" or \"memory\")")]
    UnsupportedStorage(String),

    #[error("invalid topic: {0:?}")]
    InvalidTopic(String),

    #[error("failed to load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("article {sequence} for topic {topic:?} is missing from storage")]
    MissingArticle { topic: String, sequence: usize },

    #[error("no stored articles for topic {0:?}; nothing to analyze")]
    NoArticles(String),

    #[error("failed to read from the terminal: {0}")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
