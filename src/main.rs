//! # Topic News Sentiment
//!
//! Collects news articles about a topic from a seed site, keeps the ones that
//! mention the topic (up to ten per topic), and reports the average sentiment
//! of everything stored for that topic.
//!
//! ## Usage
//!
//! ```sh
//! topic_news_sentiment -l "./news articles" -u https://www.nbcnews.com/world
//! ```
//!
//! The program then prompts for topics until `q` is entered.
//!
//! ## Architecture
//!
//! Each topic runs through the same pipeline, one article at a time:
//! 1. **Discovery**: Collect article links from the seed page
//! 2. **Filtering**: Fetch each article and keep it if it mentions the topic
//! 3. **Storage**: Normalize and save relevant articles under `<location>/<topic>/<n>.txt`
//! 4. **Analysis**: Read the stored articles back and average their sentiment

use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod formatter;
mod models;
mod scrapers;
mod sentiment;
mod store;
mod utils;

use cli::Cli;
use config::{NewsConfig, StorageKind};
use error::{Error, Result};
use formatter::{TextFormat, TextFormatter};
use models::{ARTICLE_CAP, Topic};
use scrapers::{ArticleSource, SiteScraper, scrape};
use sentiment::{LexiconScorer, SentimentAnalyzer, SentimentScorer};
use store::{ArticleStorage, ArticleStore, MemoryStorage, TextFileStorage};
use utils::ensure_writable_dir;

const PROMPT: &str = "Input your topic of interest. Type q to quit:  ";
const QUIT: &str = "q";

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let config = NewsConfig::resolve(&args)?;
    info!(
        location = %config.location.display(),
        url = %config.url,
        storage = %config.storage,
        "topic_news_sentiment starting up"
    );

    let scraper = SiteScraper::new(&config.url, config.request_timeout(), &config.user_agent)?;
    let formatter = TextFormatter::new(config.format.clone());
    let analyzer = SentimentAnalyzer::new(LexiconScorer);

    match config.storage {
        StorageKind::Text => {
            if let Err(e) = ensure_writable_dir(&config.location).await {
                error!(
                    path = %config.location.display(),
                    error = %e,
                    "Storage location is not writable (fix perms or choose a different path)"
                );
                return Err(e.into());
            }
            let store = ArticleStore::new(TextFileStorage::new(&config.location));
            run_session(store, &scraper, &formatter, &analyzer).await?;
        }
        StorageKind::Memory => {
            let store = ArticleStore::new(MemoryStorage::default());
            run_session(store, &scraper, &formatter, &analyzer).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Session ended");
    Ok(())
}

/// Prompt for topics until `q` or end of input.
///
/// A failure while processing one topic is reported and the prompt comes
/// back; only a broken terminal ends the session early.
async fn run_session<A, S, F, Sc>(
    mut store: ArticleStore<S>,
    source: &A,
    formatter: &F,
    analyzer: &SentimentAnalyzer<Sc>,
) -> Result<()>
where
    A: ArticleSource,
    S: ArticleStorage,
    F: TextFormat,
    Sc: SentimentScorer,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush().map_err(Error::Prompt)?;

        let Some(line) = lines.next_line().await.map_err(Error::Prompt)? else {
            break;
        };
        let input = line.trim().to_lowercase();
        if input == QUIT {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match process_topic(&input, &mut store, source, formatter, analyzer).await {
            Ok(score) => println!("Overall sentiment score for \"{input}\" is {score:.4}"),
            Err(Error::NoArticles(topic)) => {
                warn!(%topic, "No articles stored; skipping sentiment");
                println!("No articles about \"{topic}\" were found, so there is nothing to score.");
            }
            Err(e) => {
                error!(topic = %input, error = %e, "Failed to process topic");
                println!("Could not process \"{input}\": {e}");
            }
        }
    }
    Ok(())
}

/// Scrape one topic, then score everything stored for it.
async fn process_topic<A, S, F, Sc>(
    raw_topic: &str,
    store: &mut ArticleStore<S>,
    source: &A,
    formatter: &F,
    analyzer: &SentimentAnalyzer<Sc>,
) -> Result<f64>
where
    A: ArticleSource,
    S: ArticleStorage,
    F: TextFormat,
    Sc: SentimentScorer,
{
    let topic = Topic::parse(raw_topic)?;
    let summary = scrape(source, &topic, store, formatter).await?;
    println!(
        "Saved {} new article(s) about \"{topic}\" ({}/{ARTICLE_CAP} stored).",
        summary.saved, summary.stored
    );
    analyzer.analyze_overall_sentiment(&topic, store).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchOutcome, NewsArticle};

    struct StaticSource(Vec<&'static str>);

    impl ArticleSource for StaticSource {
        type Handle = &'static str;

        async fn discover(&self) -> Result<Vec<&'static str>> {
            Ok(self.0.clone())
        }

        async fn fetch(&self, handle: &&'static str) -> FetchOutcome {
            FetchOutcome::Fetched(NewsArticle {
                source: format!("https://news.test/{}", handle.len()),
                content: handle.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_process_topic_scrapes_then_scores() {
        let source = StaticSource(vec![
            "Election brings great hope and a peaceful victory.",
            "Sports scores from the weekend.",
            "The election crisis turned violent.",
        ]);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let analyzer = SentimentAnalyzer::new(LexiconScorer);
        let formatter = TextFormatter::default();

        let score = process_topic("Election", &mut store, &source, &formatter, &analyzer)
            .await
            .unwrap();

        let topic = Topic::parse("election").unwrap();
        assert_eq!(store.count(&topic).await.unwrap(), 2);
        let expected = (LexiconScorer.compound("election brings great hope and a peaceful victory")
            + LexiconScorer.compound("the election crisis turned violent"))
            / 2.0;
        assert!((score - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_process_topic_without_matches_reports_no_articles() {
        let source = StaticSource(vec!["Nothing relevant here."]);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let analyzer = SentimentAnalyzer::new(LexiconScorer);

        let err = process_topic("election", &mut store, &source, &TextFormatter::default(), &analyzer)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoArticles(_)));
    }

    #[tokio::test]
    async fn test_process_topic_rejects_invalid_topic() {
        let source = StaticSource(vec![]);
        let mut store = ArticleStore::new(MemoryStorage::default());
        let analyzer = SentimentAnalyzer::new(LexiconScorer);

        let err = process_topic("../etc", &mut store, &source, &TextFormatter::default(), &analyzer)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTopic(_)));
    }
}
