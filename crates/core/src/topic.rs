use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A ranked trending topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Display name (longest of the merged variants)
    pub name: String,
    /// All merged names, present only when more than one candidate merged
    pub variants: Option<Vec<String>>,
    pub post_count: usize,
    pub total_score: i64,
    pub total_comments: i64,
    pub avg_velocity: f64,
    pub topic_score: f64,
    /// Score relative to the top topic, 0-100
    pub trending_strength: f64,
    pub subreddits: BTreeSet<String>,
    /// 1-based rank, 0 until ranked
    pub rank: usize,
}

impl Topic {
    #[must_use]
    pub fn subreddit_count(&self) -> usize {
        self.subreddits.len()
    }
}
