//! Generic news site scraper.
//!
//! Discovery reads every link on the seed page and keeps the ones that look
//! like articles on the same site. Fetching downloads each article and takes
//! the text of its paragraphs, preferring paragraphs inside `<article>`.
//!
//! # URL filtering
//!
//! A link is kept when it is http(s), lives on the seed's host (subdomains
//! included), is not the seed page itself, is not a static asset, and has
//! either two or more path segments or a hyphenated slug such as
//! `/world-leaders-meet-in-geneva`.

use super::ArticleSource;
use crate::error::Result;
use crate::models::{FetchOutcome, NewsArticle};
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));
static ARTICLE_PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p").expect("valid article selector"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("valid paragraph selector"));

const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "css", "js", "json", "pdf", "xml", "rss",
    "mp3", "mp4", "zip",
];

/// Scrapes articles linked from a seed page.
#[derive(Debug, Clone)]
pub struct SiteScraper {
    client: Client,
    seed: Url,
}

impl SiteScraper {
    /// Build a scraper for `seed_url` whose requests give up after `timeout`.
    pub fn new(seed_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let seed = Url::parse(seed_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, seed })
    }

    async fn get_text(&self, url: &Url) -> Result<String> {
        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

impl ArticleSource for SiteScraper {
    type Handle = Url;

    #[instrument(level = "info", skip_all, fields(seed = %self.seed))]
    async fn discover(&self) -> Result<Vec<Url>> {
        let html = self.get_text(&self.seed).await?;
        let urls = extract_article_links(&html, &self.seed);

        if urls.is_empty() {
            warn!("Seed page contained no article links");
        }
        info!(count = urls.len(), "Indexed article URLs");
        let listed: Vec<&str> = urls.iter().map(Url::as_str).collect();
        debug!(urls = ?listed, "Article URLs");
        Ok(urls)
    }

    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        match self.get_text(url).await {
            Ok(body) => {
                let content = extract_article_text(&body);
                debug!(bytes = content.len(), "Parsed article");
                FetchOutcome::Fetched(NewsArticle {
                    source: url.to_string(),
                    content,
                })
            }
            Err(e) => FetchOutcome::Failed {
                url: url.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Resolve and filter the article links found on a seed page.
///
/// Fragments are dropped and duplicates removed, keeping first-seen order.
pub fn extract_article_links(html: &str, seed: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| seed.join(href.trim()).ok())
        .filter_map(|mut url| {
            url.set_fragment(None);
            is_article_url(&url, seed).then_some(url)
        })
        .unique()
        .collect()
}

fn is_article_url(url: &Url, seed: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let (Some(host), Some(seed_host)) = (url.host_str(), seed.host_str()) else {
        return false;
    };
    let site = seed_host.trim_start_matches("www.");
    if host != seed_host && host != site && !host.ends_with(&format!(".{site}")) {
        return false;
    }

    if url.as_str().trim_end_matches('/') == seed.as_str().trim_end_matches('/') {
        return false;
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();
    let Some(last) = segments.last() else {
        return false;
    };

    if let Some((_, ext)) = last.rsplit_once('.') {
        if ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            return false;
        }
    }

    segments.len() >= 2 || last.contains('-')
}

/// Extract the body text of an article page.
///
/// Paragraphs are whitespace-collapsed and joined with a blank line.
/// Returns an empty string when the page has no paragraph text.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let in_article = paragraphs(document.select(&ARTICLE_PARAGRAPH_SELECTOR));
    let body = if in_article.is_empty() {
        paragraphs(document.select(&PARAGRAPH_SELECTOR))
    } else {
        in_article
    };

    body.join("\n\n")
}

fn paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .map(|element| element.text().collect::<String>())
        .map(|text| text.split_whitespace().join(" "))
        .filter(|text| !text.is_empty())
        .collect()
}
