//! Text normalization applied to relevant articles before they are stored.
//!
//! The pipeline is fixed: lowercase, strip digits, strip punctuation, then
//! [`TextFormat::normalize`]. Each step is a separate trait method so a
//! formatter can replace one step (a real stemmer, say) without touching
//! the others.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "itself", "just", "me", "more", "most", "my", "myself", "now", "of", "off", "on",
        "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s",
        "same", "she", "should", "so", "some", "such", "t", "than", "that", "the", "their",
        "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
        "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "whom", "why", "will", "with", "you", "your",
        "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Optional formatting steps, read from the `format:` section of the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Drop common English stop words after normalization.
    pub remove_stop_words: bool,
}

/// A text-cleaning pipeline made of individually overridable steps.
///
/// Only [`format`](TextFormat::format) is called by the scrape driver. The
/// default implementations of every step are what [`TextFormatter`] uses.
pub trait TextFormat {
    /// Run the full pipeline in its fixed order.
    fn format(&self, text: &str) -> String {
        let text = self.lowercase(text);
        let text = self.remove_numbers(&text);
        let text = self.remove_punctuation(&text);
        let text = self.normalize(&text);
        self.remove_stop_words(&text)
    }

    fn lowercase(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn remove_numbers(&self, text: &str) -> String {
        DIGITS.replace_all(text, "").into_owned()
    }

    /// Remove every character that is neither a word character nor whitespace.
    fn remove_punctuation(&self, text: &str) -> String {
        PUNCTUATION.replace_all(text, "").into_owned()
    }

    fn normalize(&self, text: &str) -> String {
        self.lemmatize(&self.stem(text))
    }

    fn stem(&self, text: &str) -> String {
        text.to_string()
    }

    fn lemmatize(&self, text: &str) -> String {
        text.to_string()
    }

    /// Identity unless a formatter opts in.
    fn remove_stop_words(&self, text: &str) -> String {
        text.to_string()
    }
}

/// The default formatter.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    settings: FormatSettings,
}

impl TextFormatter {
    pub fn new(settings: FormatSettings) -> Self {
        Self { settings }
    }
}

impl TextFormat for TextFormatter {
    fn remove_stop_words(&self, text: &str) -> String {
        if !self.settings.remove_stop_words {
            return text.to_string();
        }
        text.split_whitespace()
            .filter(|word| !STOP_WORDS.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
