//! Topic-scoped, capped, sequentially numbered article storage.
//!
//! [`ArticleStore`] owns the per-topic counters and enforces the cap; the
//! [`ArticleStorage`] backends only know how to put and get text keyed by
//! `(topic, sequence)`.
//!
//! # Backends
//!
//! | Backend | Module | Lifetime |
//! |---------|--------|----------|
//! | Text files | [`text`] | `<location>/<topic>/<n>.txt`, survives restarts |
//! | Memory | [`memory`] | Process lifetime |

pub mod memory;
pub mod text;

pub use memory::MemoryStorage;
pub use text::TextFileStorage;

use crate::error::Result;
use crate::models::{ARTICLE_CAP, Topic};
use futures::stream::{self, Stream, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A key-value medium for article text.
///
/// Sequence numbers are 1-based. Errors from the medium are returned as-is
/// and are fatal for the current topic.
pub trait ArticleStorage {
    /// Write `text` as record `sequence` of `topic`, creating the topic's
    /// namespace if needed.
    async fn persist(&mut self, topic: &Topic, sequence: usize, text: &str) -> Result<()>;

    /// Read back record `sequence` of `topic`.
    async fn retrieve(&self, topic: &Topic, sequence: usize) -> Result<String>;

    /// Number of contiguous records `1..=n` already present for `topic`.
    async fn stored_count(&self, topic: &Topic) -> Result<usize>;
}

/// Capped article store keyed by topic.
///
/// Counters are seeded from the backend the first time a topic is touched,
/// so numbering resumes where an earlier run left off.
#[derive(Debug)]
pub struct ArticleStore<S> {
    storage: S,
    counts: HashMap<Topic, usize>,
}

impl<S: ArticleStorage> ArticleStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            counts: HashMap::new(),
        }
    }

    /// Current number of stored articles for `topic`.
    pub async fn count(&mut self, topic: &Topic) -> Result<usize> {
        if let Some(&count) = self.counts.get(topic) {
            return Ok(count);
        }
        let existing = self.storage.stored_count(topic).await?.min(ARTICLE_CAP);
        if existing > 0 {
            info!(topic = %topic, existing, "Resuming article numbering from storage");
        }
        self.counts.insert(topic.clone(), existing);
        Ok(existing)
    }

    pub async fn is_full(&mut self, topic: &Topic) -> Result<bool> {
        Ok(self.count(topic).await? >= ARTICLE_CAP)
    }

    /// Save one article and return the topic's count afterwards.
    ///
    /// Once the topic holds [`ARTICLE_CAP`] articles this is a no-op that
    /// returns the unchanged count, so callers must not assume every call
    /// persists. The counter only advances after the write succeeded.
    #[instrument(level = "info", skip_all, fields(topic = %topic))]
    pub async fn save(&mut self, topic: &Topic, text: &str) -> Result<usize> {
        let count = self.count(topic).await?;
        if count >= ARTICLE_CAP {
            debug!(count, "Topic is full; dropping article");
            return Ok(count);
        }

        let sequence = count + 1;
        self.storage.persist(topic, sequence, text).await?;
        self.counts.insert(topic.clone(), sequence);
        info!(sequence, bytes = text.len(), "Saved article");
        Ok(sequence)
    }

    /// Lazily read back every stored article for `topic`, oldest first.
    ///
    /// The number of records is fixed when this is called; saves made while
    /// the stream is alive are not picked up. A topic with nothing stored
    /// yields an empty stream.
    pub async fn read_articles<'a>(
        &'a mut self,
        topic: &Topic,
    ) -> Result<impl Stream<Item = Result<String>> + 'a> {
        let count = self.count(topic).await?;
        debug!(topic = %topic, count, "Reading stored articles");

        let storage = &self.storage;
        let topic = topic.clone();
        Ok(stream::iter(1..=count).then(move |sequence| {
            let topic = topic.clone();
            async move { storage.retrieve(&topic, sequence).await }
        }))
    }
}
