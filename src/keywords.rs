//! Keyword extraction for keyword-style graphs.
//!
//! Pure text-to-token-list utility: no side effects, deterministic for fixed
//! inputs, restartable (the returned Vec can be iterated any number of times).

use std::collections::HashSet;

/// Default minimum token length.
pub const DEFAULT_MIN_LEN: usize = 4;

/// Default cap on the number of extracted keywords.
pub const DEFAULT_MAX_KEYWORDS: usize = 20;

/// Common English stop words that add noise and don't make useful nodes.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "should", "could", "what", "which", "who", "where", "when",
    "why", "how", "this", "that", "these", "those", "their", "there", "into", "over", "under",
    "about", "between", "also", "than", "then", "its", "it's", "such", "other", "more", "most",
    "some", "any", "each", "while", "during",
];

/// Extracts an ordered, deduplicated list of lowercase keywords from raw text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    min_len: usize,
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(
            STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_MIN_LEN,
            DEFAULT_MAX_KEYWORDS,
        )
    }
}

impl KeywordExtractor {
    /// Create an extractor with an explicit stop-word set and limits.
    pub fn new(stop_words: HashSet<String>, min_len: usize, max_keywords: usize) -> Self {
        Self {
            stop_words,
            min_len,
            max_keywords,
        }
    }

    /// Extractor with the default stop-word set and configured limits.
    pub fn from_config(config: &crate::config::KeywordsConfig) -> Self {
        Self {
            min_len: config.min_token_len,
            max_keywords: config.max_keywords,
            ..Self::default()
        }
    }

    /// Extract keywords in first-occurrence order.
    ///
    /// Punctuation is stripped, tokens are lowercased, stop words and tokens
    /// shorter than the configured minimum are dropped, duplicates keep their
    /// first occurrence, and the result is capped at the configured maximum.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for raw in text.split_whitespace() {
            if keywords.len() >= self.max_keywords {
                break;
            }
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.chars().count() < self.min_len || self.stop_words.contains(&token) {
                continue;
            }
            if seen.insert(token.clone()) {
                keywords.push(token);
            }
        }

        keywords
    }
}
