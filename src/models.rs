//! Data models shared across the pipeline.
//!
//! - [`Topic`]: normalized keyword naming a storage namespace and relevance filter
//! - [`NewsArticle`]: raw article text as fetched from a news site
//! - [`FetchOutcome`]: result of fetching one candidate article
//! - [`ScrapeSummary`]: counters collected by one scrape pass

use crate::error::{Error, Result};
use std::fmt;

/// Maximum number of articles kept per topic.
pub const ARTICLE_CAP: usize = 10;

/// A normalized topic key.
///
/// Topics are trimmed and lowercased on construction. Because a topic also
/// names a directory under the storage location, path separators and
/// leading dots are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: &str) -> Result<Self> {
        let topic = raw.trim().to_lowercase();
        if topic.is_empty()
            || topic.starts_with('.')
            || topic.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(Error::InvalidTopic(raw.to_string()));
        }
        Ok(Topic(topic))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw news article as fetched from a news site.
///
/// # Fields
///
/// * `source` - The URL the article was fetched from
/// * `content` - The extracted article body text
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub source: String,
    pub content: String,
}

/// Outcome of fetching a single candidate article.
///
/// Fetch failures are expected (paywalls, dead links, timeouts) and carry
/// only enough context to log them. The scrape driver skips them without
/// attempting to parse anything.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(NewsArticle),
    Failed { url: String, reason: String },
}

/// Counters collected while scraping one topic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Article links discovered on the seed page.
    pub candidates: usize,
    /// Articles whose text was fetched.
    pub fetched: usize,
    /// Articles whose fetch failed and were skipped.
    pub failed: usize,
    /// Fetched articles that mention the topic.
    pub relevant: usize,
    /// Articles written to storage during this pass.
    pub saved: usize,
    /// Articles stored for the topic once the pass finished.
    pub stored: usize,
}
