//! Article discovery, relevance filtering, and the scrape driver.
//!
//! Scraping a topic follows the same two phases for every source:
//!
//! 1. **Discovery**: [`ArticleSource::discover`] lists candidate articles
//! 2. **Fetching**: [`ArticleSource::fetch`] downloads each candidate in turn
//!
//! [`scrape`] then keeps the articles that mention the topic, normalizes
//! them, and hands them to the [`ArticleStore`] until the topic is full.
//! Candidates are processed strictly one at a time, in discovery order.
//!
//! # Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Any news site | [`site`] | Links on the seed page, `<p>` text of each article |

pub mod site;

pub use site::SiteScraper;

use crate::error::Result;
use crate::formatter::TextFormat;
use crate::models::{ARTICLE_CAP, FetchOutcome, ScrapeSummary, Topic};
use crate::store::{ArticleStorage, ArticleStore};
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument};

/// A place articles can be discovered and fetched from.
pub trait ArticleSource {
    /// Whatever the source needs to fetch one article later.
    type Handle;

    /// List candidate articles, in the order they should be processed.
    async fn discover(&self) -> Result<Vec<Self::Handle>>;

    /// Fetch one article. Failures are reported, never raised.
    async fn fetch(&self, handle: &Self::Handle) -> FetchOutcome;
}

/// Whether `text` mentions `topic`, ignoring case.
pub fn is_relevant(topic: &Topic, text: &str) -> bool {
    text.to_lowercase().contains(topic.as_str())
}

/// Scrape `source` for articles about `topic` and store the relevant ones.
///
/// Returns early without contacting the source when the topic already holds
/// [`ARTICLE_CAP`] articles, and stops fetching as soon as the cap is reached.
/// Only discovery and storage errors are returned; a failed article fetch is
/// logged and skipped.
#[instrument(level = "info", skip_all, fields(topic = %topic))]
pub async fn scrape<A, S, F>(
    source: &A,
    topic: &Topic,
    store: &mut ArticleStore<S>,
    formatter: &F,
) -> Result<ScrapeSummary>
where
    A: ArticleSource,
    S: ArticleStorage,
    F: TextFormat + ?Sized,
{
    let mut summary = ScrapeSummary::default();
    if store.is_full(topic).await? {
        info!("Topic is already full; skipping scrape");
        summary.stored = ARTICLE_CAP;
        return Ok(summary);
    }
    let stored_before = store.count(topic).await?;

    let handles = source.discover().await?;
    summary.candidates = handles.len();
    info!(candidates = summary.candidates, "Discovered candidate articles");

    for handle in &handles {
        let article = match source.fetch(handle).await {
            FetchOutcome::Fetched(article) => {
                summary.fetched += 1;
                article
            }
            FetchOutcome::Failed { url, reason } => {
                summary.failed += 1;
                debug!(%url, %reason, "Skipping article that failed to fetch");
                continue;
            }
        };

        if !is_relevant(topic, &article.content) {
            debug!(url = %article.source, "Article does not mention topic");
            continue;
        }
        summary.relevant += 1;

        let formatted = formatter.format(&article.content);
        let count = store.save(topic, &formatted).await?;
        debug!(
            url = %article.source,
            count,
            preview = %truncate_for_log(&formatted, 80),
            "Stored relevant article"
        );
        if count >= ARTICLE_CAP {
            info!(count, "Reached article cap; stopping");
            break;
        }
    }

    summary.stored = store.count(topic).await?;
    summary.saved = summary.stored - stored_before;
    info!(
        candidates = summary.candidates,
        fetched = summary.fetched,
        failed = summary.failed,
        relevant = summary.relevant,
        saved = summary.saved,
        stored = summary.stored,
        "Scrape finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::TextFormatter;
    use crate::models::NewsArticle;
    use crate::store::MemoryStorage;
    use futures::TryStreamExt;
    use std::cell::{Cell, RefCell};

    /// Serves a fixed list of outcomes and records what was fetched.
    struct FakeSource {
        outcomes: Vec<FetchOutcome>,
        discover_calls: Cell<usize>,
        fetched: RefCell<Vec<usize>>,
    }

    impl FakeSource {
        fn new(outcomes: Vec<FetchOutcome>) -> Self {
            Self {
                outcomes,
                discover_calls: Cell::new(0),
                fetched: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArticleSource for FakeSource {
        type Handle = usize;

        async fn discover(&self) -> Result<Vec<usize>> {
            self.discover_calls.set(self.discover_calls.get() + 1);
            Ok((0..self.outcomes.len()).collect())
        }

        async fn fetch(&self, handle: &usize) -> FetchOutcome {
            self.fetched.borrow_mut().push(*handle);
            self.outcomes[*handle].clone()
        }
    }

    fn fetched(url: &str, content: &str) -> FetchOutcome {
        FetchOutcome::Fetched(NewsArticle {
            source: url.to_string(),
            content: content.to_string(),
        })
    }

    fn failed(url: &str) -> FetchOutcome {
        FetchOutcome::Failed {
            url: url.to_string(),
            reason: "connection reset".to_string(),
        }
    }

    fn topic(s: &str) -> Topic {
        Topic::parse(s).unwrap()
    }

    #[test]
    fn test_relevance_is_case_insensitive_substring() {
        let t = topic("election");
        assert!(is_relevant(&t, "The ELECTION results are in."));
        assert!(is_relevant(&t, "Re-elections scheduled"));
        assert!(!is_relevant(&t, "Markets rallied on Tuesday."));
    }

    #[tokio::test]
    async fn test_scrape_saves_only_relevant_articles() {
        let source = FakeSource::new(vec![
            fetched("https://news.test/a", "Election day: 3 candidates!"),
            fetched("https://news.test/b", "Weather is mild."),
            fetched("https://news.test/c", "An election recount begins."),
        ]);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let t = topic("Election");

        let summary = scrape(&source, &t, &mut store, &TextFormatter::default())
            .await
            .unwrap();

        assert_eq!(summary.candidates, 3);
        assert_eq!(summary.relevant, 2);
        assert_eq!(summary.saved, 2);
        assert_eq!(summary.stored, 2);

        let stored: Vec<String> = store
            .read_articles(&t)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(stored, vec!["election day  candidates", "an election recount begins"]);
    }

    #[tokio::test]
    async fn test_scrape_skips_failed_fetches() {
        let source = FakeSource::new(vec![
            failed("https://news.test/a"),
            fetched("https://news.test/b", "election news"),
        ]);
        let mut store = ArticleStore::new(MemoryStorage::default());

        let summary = scrape(&source, &topic("election"), &mut store, &TextFormatter::default())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.saved, 1);
    }

    #[tokio::test]
    async fn test_scrape_stops_at_cap() {
        let outcomes = (0..15)
            .map(|i| fetched(&format!("https://news.test/{i}"), &format!("election story {i}")))
            .collect();
        let source = FakeSource::new(outcomes);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let t = topic("election");

        let summary = scrape(&source, &t, &mut store, &TextFormatter::default())
            .await
            .unwrap();

        assert_eq!(summary.saved, ARTICLE_CAP);
        assert_eq!(store.count(&t).await.unwrap(), ARTICLE_CAP);
        assert_eq!(*source.fetched.borrow(), (0..ARTICLE_CAP).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_scrape_full_topic_does_not_discover() {
        let source = FakeSource::new(vec![fetched("https://news.test/a", "election")]);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let t = topic("election");
        for i in 0..ARTICLE_CAP {
            store.save(&t, &format!("{i}")).await.unwrap();
        }

        let summary = scrape(&source, &t, &mut store, &TextFormatter::default())
            .await
            .unwrap();

        assert_eq!(source.discover_calls.get(), 0);
        assert_eq!(summary.saved, 0);
        assert_eq!(summary.stored, ARTICLE_CAP);
    }

    #[tokio::test]
    async fn test_scrape_continues_numbering_across_passes() {
        let mut store = ArticleStore::new(MemoryStorage::default());
        let t = topic("election");

        let first = FakeSource::new(vec![fetched("https://news.test/a", "election one")]);
        scrape(&first, &t, &mut store, &TextFormatter::default())
            .await
            .unwrap();
        let second = FakeSource::new(vec![fetched("https://news.test/b", "election two")]);
        let summary = scrape(&second, &t, &mut store, &TextFormatter::default())
            .await
            .unwrap();

        assert_eq!(summary.saved, 1);
        assert_eq!(summary.stored, 2);
    }
}
