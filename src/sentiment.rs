//! Sentiment scoring for stored articles.
//!
//! [`SentimentScorer`] turns one text into a compound score in `[-1.0, 1.0]`.
//! [`SentimentAnalyzer`] reads back everything stored for a topic and
//! averages the per-article scores.
//!
//! # Lexicon scoring
//!
//! [`LexiconScorer`] follows the VADER approach: each token found in the
//! lexicon contributes its valence, boosted by an intensifier directly
//! before it and flipped (and damped) by a negation in the three tokens
//! before it. The summed valence is normalized with
//! `sum / sqrt(sum² + 15)`.

use crate::error::{Error, Result};
use crate::models::Topic;
use crate::store::{ArticleStorage, ArticleStore};
use futures::StreamExt;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCREMENT: f64 = 0.293;
const NEGATION_WINDOW: usize = 3;

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("positive", 2.6),
        ("success", 2.7), ("successful", 2.8), ("win", 2.8), ("wins", 2.7),
        ("won", 2.7), ("victory", 2.8), ("peace", 2.5), ("peaceful", 2.2),
        ("agreement", 2.2), ("support", 1.7), ("supports", 1.7), ("help", 1.7),
        ("helps", 1.6), ("hope", 1.9), ("hopeful", 2.3), ("improve", 1.9),
        ("improved", 2.1), ("growth", 1.6), ("gain", 2.4), ("gains", 1.8),
        ("safe", 1.9), ("safety", 1.8), ("relief", 2.1), ("rescue", 2.3),
        ("rescued", 1.8), ("celebrate", 2.7), ("celebration", 2.7),
        ("happy", 2.7), ("love", 3.2), ("strong", 2.3), ("stable", 1.2),
        ("progress", 1.8), ("benefit", 2.0), ("free", 2.3), ("freedom", 3.2),
        ("protect", 1.6), ("honest", 2.3), ("optimistic", 1.3), ("praise", 2.6),
        ("praised", 2.2), ("recovery", 1.4), ("welcome", 2.0), ("best", 3.2),
        // negative
        ("bad", -2.5), ("terrible", -2.1), ("war", -2.9), ("attack", -2.1),
        ("attacks", -1.9), ("killed", -3.5), ("kill", -3.7), ("death", -2.9),
        ("dead", -3.3), ("crisis", -3.1), ("conflict", -1.3), ("violence", -3.1),
        ("violent", -2.9), ("fear", -2.2), ("fears", -1.8), ("threat", -2.4),
        ("threats", -1.8), ("crash", -1.7), ("disaster", -3.1), ("loss", -1.3),
        ("losses", -1.7), ("lost", -1.3), ("fail", -2.5), ("failed", -2.3),
        ("failure", -2.3), ("corruption", -1.9), ("fraud", -2.8), ("scandal", -1.9),
        ("protest", -1.0), ("protests", -1.2), ("injured", -1.7), ("danger", -2.4),
        ("dangerous", -2.1), ("sad", -2.1), ("angry", -2.3), ("anger", -2.7),
        ("hate", -2.7), ("worst", -3.1), ("worse", -2.1), ("decline", -1.1),
        ("collapse", -2.2), ("arrested", -2.1), ("accused", -1.6), ("blame", -1.4),
        ("condemn", -1.6), ("condemned", -1.9), ("destroyed", -3.4), ("terror", -3.0),
        ("bomb", -2.2), ("shooting", -1.4), ("chaos", -2.7), ("poverty", -2.3),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "nor", "neither", "without", "none", "nothing", "cannot",
        "cant", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "werent", "wont",
        "wouldnt", "shouldnt", "couldnt", "hasnt", "havent", "hadnt",
    ]
    .into_iter()
    .collect()
});

static BOOSTERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very", "extremely", "highly", "really", "incredibly", "hugely", "deeply",
        "totally", "completely", "especially", "particularly", "most", "so",
    ]
    .into_iter()
    .collect()
});

/// Scores the overall polarity of a text.
pub trait SentimentScorer {
    /// Compound score, conventionally within `[-1.0, 1.0]`.
    fn compound(&self, text: &str) -> f64;
}

/// Lexicon-based compound scorer with negation and intensifier handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .replace('\'', "")
                    .to_lowercase()
            })
            .filter(|token| !token.is_empty())
            .collect();

        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = LEXICON.get(token.as_str()) else {
                continue;
            };
            let mut valence = valence;

            if i > 0 && BOOSTERS.contains(tokens[i - 1].as_str()) {
                valence += BOOSTER_INCREMENT.copysign(valence);
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| NEGATIONS.contains(t.as_str())) {
                valence *= NEGATION_SCALAR;
            }

            sum += valence;
        }

        normalize(sum)
    }
}

fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        return 0.0;
    }
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Averages the sentiment of every article stored for a topic.
#[derive(Debug, Default)]
pub struct SentimentAnalyzer<Sc = LexiconScorer> {
    scorer: Sc,
}

impl<Sc: SentimentScorer> SentimentAnalyzer<Sc> {
    pub fn new(scorer: Sc) -> Self {
        Self { scorer }
    }

    pub fn analyze_article(&self, article: &str) -> f64 {
        self.scorer.compound(article)
    }

    /// Mean compound score over all stored articles for `topic`.
    ///
    /// Scores are collected per call, so analyzing several topics with one
    /// analyzer never mixes their articles.
    ///
    /// # Errors
    ///
    /// [`Error::NoArticles`] when nothing is stored for the topic, plus any
    /// error raised while reading the stored articles back.
    #[instrument(level = "info", skip_all, fields(topic = %topic))]
    pub async fn analyze_overall_sentiment<S: ArticleStorage>(
        &self,
        topic: &Topic,
        store: &mut ArticleStore<S>,
    ) -> Result<f64> {
        let mut scores = Vec::new();
        let articles = store.read_articles(topic).await?;
        let mut articles = std::pin::pin!(articles);

        while let Some(article) = articles.next().await {
            let score = self.analyze_article(&article?);
            debug!(sequence = scores.len() + 1, score, "Scored article");
            scores.push(score);
        }

        if scores.is_empty() {
            return Err(Error::NoArticles(topic.to_string()));
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        info!(articles = scores.len(), mean, "Computed overall sentiment");
        Ok(mean)
    }
}
