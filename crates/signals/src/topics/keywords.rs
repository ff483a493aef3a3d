//! Heuristic keyword extraction from item titles.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::collections::HashSet;

/// Words that never make a topic on their own.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "should", "could", "may", "might", "must", "can", "about",
    "just", "this", "that", "these", "those", "there", "here", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "than", "too",
    "very", "my", "your", "his", "her", "its", "our", "their", "what", "which", "who", "whom",
    "whose", "if", "then", "else", "so", "as", "into", "through", "during", "before", "after",
    "above", "below", "between", "under", "again", "new", "first", "last", "long", "great",
    "little", "own", "same", "get", "got", "make", "made", "know", "think", "take", "see",
    "come", "want", "look", "use", "find", "give", "tell", "work", "call", "try", "reddit",
    "post", "sub", "subreddit", "comment", "thread",
];

/// Candidate patterns, applied in order. Each captures the phrase in group 1.
const PATTERNS: &[(&str, &str)] = &[
    // "iPhone 17 Pro", "PS5 Pro", "RTX 4090"
    (
        "product",
        r"\b([a-z]?[A-Z][a-zA-Z0-9]*(?:\s*(?:\d+|Pro|Max|Ultra|Plus|Mini|Air))+)\b",
    ),
    // "World Cup 2026", "Tech Summit 2025"
    (
        "event",
        r"\b([A-Z][a-zA-Z]*\s+(?:Cup|Bowl|Championship|Olympics|Conference|Summit)\s+\d{4})\b",
    ),
    // Title-case runs of any length, including single words
    ("title_case", r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b"),
    // "NASAArtemis"-style acronym + word
    ("acronym_word", r"\b([A-Z]{2,}(?:[A-Z][a-z]+)+)\b"),
    // Title-case phrases of 2-4 words
    ("phrase", r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})\b"),
    // Bare capitalized words, including acronyms
    ("capitalized", r"\b([A-Z][a-zA-Z0-9]+)\b"),
];

/// Extracts candidate topic keywords from short texts.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    patterns: Vec<Regex>,
    stop_words: HashSet<&'static str>,
    min_length: usize,
}

impl KeywordExtractor {
    /// Compiles the candidate patterns.
    ///
    /// # Errors
    /// Returns an error if a pattern fails to compile.
    pub fn new(min_length: usize) -> Result<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|(name, pattern)| {
                Regex::new(pattern).map_err(|e| anyhow!("invalid {name} pattern: {e}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            stop_words: STOP_WORDS.iter().copied().collect(),
            min_length,
        })
    }

    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Cleans a raw match: trims surrounding ASCII punctuation and rejects
    /// short words and stop words.
    fn clean(&self, raw: &str) -> Option<String> {
        let keyword = raw.trim().trim_matches(|c: char| c.is_ascii_punctuation());
        if keyword.chars().count() < self.min_length {
            return None;
        }
        if self.stop_words.contains(keyword.to_lowercase().as_str()) {
            return None;
        }
        Some(keyword.to_string())
    }

    /// Returns the distinct keywords found in `text`, in first-seen order.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                if let Some(keyword) = self.clean(m.as_str()) {
                    if seen.insert(keyword.clone()) {
                        keywords.push(keyword);
                    }
                }
            }
        }

        keywords
    }
}
