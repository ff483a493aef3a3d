//! Trending topic extraction.
//!
//! Pipeline: keywords per title -> candidate selection by mention count ->
//! engagement scoring -> similarity merge -> `min_posts` filter -> ranking.
//!
//! Candidate score:
//! `100 * mentions + 0.5 * total_score + 2 * total_comments + 10 * avg_velocity`

mod cluster;
mod keywords;

pub use cluster::{are_topics_similar, merge_similar, TopicCandidate};
pub use keywords::{KeywordExtractor, STOP_WORDS};

use crate::velocity::ScoredItem;
use anyhow::Result;
use pulse_core::{TimestampedItem, Topic, TrendingConfig};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

const MENTION_WEIGHT: f64 = 100.0;
const SCORE_WEIGHT: f64 = 0.5;
const COMMENT_WEIGHT: f64 = 2.0;
const VELOCITY_WEIGHT: f64 = 10.0;

/// Extracts ranked trending topics from scored items.
#[derive(Debug, Clone)]
pub struct TopicExtractor {
    keywords: KeywordExtractor,
    candidate_multiplier: usize,
}

impl TopicExtractor {
    /// Creates an extractor from trending configuration.
    ///
    /// # Errors
    /// Returns an error if the keyword patterns fail to compile.
    pub fn new(config: &TrendingConfig) -> Result<Self> {
        Ok(Self {
            keywords: KeywordExtractor::new(config.min_keyword_length)?,
            candidate_multiplier: config.candidate_multiplier.max(1),
        })
    }

    /// Returns the keyword extractor.
    #[must_use]
    pub const fn keywords(&self) -> &KeywordExtractor {
        &self.keywords
    }

    /// Builds up to `limit` scored candidates, sorted by topic score.
    ///
    /// Keywords are ranked by how many items mention them (ties go to the
    /// keyword seen first) before the cut.
    #[must_use]
    pub fn candidates(&self, items: &[ScoredItem], limit: usize) -> Vec<TopicCandidate> {
        // keyword -> indices of items whose title produced it
        let mut mentions: HashMap<String, Vec<usize>> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for (idx, scored) in items.iter().enumerate() {
            for keyword in self.keywords.extract(&scored.item.title) {
                let entry = mentions.entry(keyword.clone()).or_default();
                if entry.is_empty() {
                    first_seen.push(keyword);
                }
                entry.push(idx);
            }
        }

        // Stable sort keeps first-seen order among equal counts
        let mut ordered: Vec<(&String, &Vec<usize>)> = first_seen
            .iter()
            .filter_map(|kw| mentions.get(kw).map(|idxs| (kw, idxs)))
            .collect();
        ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        ordered.truncate(limit);

        let mut candidates: Vec<TopicCandidate> = ordered
            .into_iter()
            .map(|(keyword, idxs)| score_candidate(keyword, idxs, items))
            .collect();
        candidates.sort_by(|a, b| b.topic_score.total_cmp(&a.topic_score));
        candidates
    }

    /// Extracts, merges and ranks topics.
    ///
    /// Returns at most `top_n` topics with at least `min_posts` posts, ranked
    /// 1..N by topic score. The top topic has a trending strength of 100.
    #[must_use]
    pub fn extract(&self, items: &[ScoredItem], top_n: usize, min_posts: usize) -> Vec<Topic> {
        if items.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let candidates = self.candidates(items, top_n.saturating_mul(self.candidate_multiplier));
        let candidate_count = candidates.len();

        let mut topics: Vec<Topic> = merge_similar(&candidates)
            .into_iter()
            .filter(|t| t.post_count >= min_posts)
            .collect();
        topics.sort_by(|a, b| b.topic_score.total_cmp(&a.topic_score));
        topics.truncate(top_n);

        let max_score = topics.first().map_or(0.0, |t| t.topic_score);
        for (idx, topic) in topics.iter_mut().enumerate() {
            topic.rank = idx + 1;
            topic.trending_strength = if max_score > 0.0 {
                (100.0 * topic.topic_score / max_score).clamp(0.0, 100.0)
            } else {
                0.0
            };
        }

        debug!(
            items = items.len(),
            candidates = candidate_count,
            topics = topics.len(),
            "extracted trending topics"
        );
        topics
    }

    /// Keywords that co-occur with `topic` in item titles.
    ///
    /// Looks at items whose title contains the topic (case-insensitive), and
    /// returns up to `limit` of their most frequent keywords, excluding the
    /// topic itself and its individual words.
    #[must_use]
    pub fn related_keywords(
        &self,
        topic: &str,
        items: &[TimestampedItem],
        limit: usize,
    ) -> Vec<String> {
        let topic_lower = topic.to_lowercase();
        let topic_words: BTreeSet<&str> = topic_lower.split_whitespace().collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for item in items
            .iter()
            .filter(|i| i.title.to_lowercase().contains(&topic_lower))
        {
            for keyword in self.keywords.extract(&item.title) {
                let count = counts.entry(keyword.clone()).or_insert(0);
                if *count == 0 {
                    first_seen.push(keyword);
                }
                *count += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = first_seen
            .into_iter()
            .filter(|kw| {
                let lower = kw.to_lowercase();
                lower != topic_lower && !topic_words.contains(lower.as_str())
            })
            .map(|kw| {
                let count = counts.get(&kw).copied().unwrap_or(0);
                (kw, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(limit).map(|(kw, _)| kw).collect()
    }
}

fn score_candidate(keyword: &str, idxs: &[usize], items: &[ScoredItem]) -> TopicCandidate {
    let related: Vec<&ScoredItem> = idxs.iter().filter_map(|&i| items.get(i)).collect();
    let mentions = related.len();

    let total_score: i64 = related.iter().map(|s| s.item.score).sum();
    let total_comments: i64 = related.iter().map(|s| s.item.comment_count).sum();
    let avg_velocity = if mentions > 0 {
        related.iter().map(|s| s.velocity).sum::<f64>() / mentions as f64
    } else {
        0.0
    };

    let topic_score = MENTION_WEIGHT * mentions as f64
        + SCORE_WEIGHT * total_score as f64
        + COMMENT_WEIGHT * total_comments as f64
        + VELOCITY_WEIGHT * avg_velocity;

    TopicCandidate {
        name: keyword.to_string(),
        post_count: mentions,
        total_score,
        total_comments,
        avg_velocity,
        topic_score,
        subreddits: related
            .iter()
            .map(|s| s.item.subreddit.clone())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// Extracts ranked topics with default trending settings.
///
/// # Errors
/// Returns an error if the keyword patterns fail to compile.
pub fn extract_topics(items: &[ScoredItem], top_n: usize, min_posts: usize) -> Result<Vec<Topic>> {
    let extractor = TopicExtractor::new(&TrendingConfig::default())?;
    Ok(extractor.extract(items, top_n, min_posts))
}
