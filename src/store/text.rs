//! Plain text file backend.
//!
//! # Layout
//!
//! ```text
//! location/
//! └── election/
//!     ├── 1.txt
//!     ├── 2.txt
//!     └── 3.txt
//! ```
//!
//! Each file holds exactly the formatted article text, with no header.

use super::ArticleStorage;
use crate::error::{Error, Result};
use crate::models::Topic;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct TextFileStorage {
    location: PathBuf,
}

impl TextFileStorage {
    pub fn new(location: impl AsRef<Path>) -> Self {
        Self {
            location: location.as_ref().to_path_buf(),
        }
    }

    pub fn topic_dir(&self, topic: &Topic) -> PathBuf {
        self.location.join(topic.as_str())
    }

    pub fn article_path(&self, topic: &Topic, sequence: usize) -> PathBuf {
        self.topic_dir(topic).join(format!("{sequence}.txt"))
    }
}

impl ArticleStorage for TextFileStorage {
    #[instrument(level = "debug", skip_all, fields(topic = %topic, sequence = sequence))]
    async fn persist(&mut self, topic: &Topic, sequence: usize, text: &str) -> Result<()> {
        let dir = self.topic_dir(topic);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::io(&dir, e))?;

        let path = self.article_path(topic, sequence);
        fs::write(&path, text)
            .await
            .map_err(|e| Error::io(&path, e))?;
        debug!(path = %path.display(), "Wrote article file");
        Ok(())
    }

    async fn retrieve(&self, topic: &Topic, sequence: usize) -> Result<String> {
        let path = self.article_path(topic, sequence);
        fs::read_to_string(&path)
            .await
            .map_err(|e| Error::io(&path, e))
    }

    async fn stored_count(&self, topic: &Topic) -> Result<usize> {
        let dir = self.topic_dir(topic);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(0),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::io(&dir, e)),
        }

        let mut count = 0;
        loop {
            let path = self.article_path(topic, count + 1);
            let exists = fs::try_exists(&path)
                .await
                .map_err(|e| Error::io(&path, e))?;
            if !exists {
                return Ok(count);
            }
            count += 1;
        }
    }
}
