//! In-memory backend. Articles live only as long as the process.

use super::ArticleStorage;
use crate::error::{Error, Result};
use crate::models::Topic;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    articles: HashMap<(Topic, usize), String>,
}

impl ArticleStorage for MemoryStorage {
    async fn persist(&mut self, topic: &Topic, sequence: usize, text: &str) -> Result<()> {
        self.articles
            .insert((topic.clone(), sequence), text.to_string());
        Ok(())
    }

    async fn retrieve(&self, topic: &Topic, sequence: usize) -> Result<String> {
        self.articles
            .get(&(topic.clone(), sequence))
            .cloned()
            .ok_or_else(|| Error::MissingArticle {
                topic: topic.to_string(),
                sequence,
            })
    }

    async fn stored_count(&self, topic: &Topic) -> Result<usize> {
        let mut count = 0;
        while self.articles.contains_key(&(topic.clone(), count + 1)) {
            count += 1;
        }
        Ok(count)
    }
}
