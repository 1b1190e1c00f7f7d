//! Command-line interface definitions.
//!
//! Every option is optional; anything not given here falls back to the
//! config file (if any) and then to the built-in defaults in
//! [`NewsConfig`](crate::config::NewsConfig).

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: store under "./news articles", discover from NBC News World
/// topic_news_sentiment
///
/// # Different site and storage root
/// topic_news_sentiment -l ./articles -u https://www.bbc.com/news
///
/// # Keep nothing on disk
/// topic_news_sentiment --storage memory
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for stored articles [default: "news articles"]
    #[arg(short, long, env = "NEWS_LOCATION")]
    pub location: Option<PathBuf>,

    /// Seed page to discover articles from [default: https://www.nbcnews.com/world]
    #[arg(short, long, env = "NEWS_URL")]
    pub url: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storage backend, "text" or "memory" [default: text]
    #[arg(short, long)]
    pub storage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "topic_news_sentiment",
            "--location",
            "./articles",
            "--url",
            "https://www.bbc.com/news",
        ]);

        assert_eq!(cli.location, Some(PathBuf::from("./articles")));
        assert_eq!(cli.url.as_deref(), Some("https://www.bbc.com/news"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "topic_news_sentiment",
            "-l",
            "/tmp/news",
            "-u",
            "https://example.com/world",
            "-s",
            "memory",
        ]);

        assert_eq!(cli.location, Some(PathBuf::from("/tmp/news")));
        assert_eq!(cli.url.as_deref(), Some("https://example.com/world"));
        assert_eq!(cli.storage.as_deref(), Some("memory"));
    }
}
