//! Time-bucketed aggregation outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-width, half-open time window `[start, end)` with its dominant sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    /// Exclusive upper bound
    pub end: DateTime<Utc>,
    pub item_count: usize,
    /// +1 / -1 when a non-neutral majority exists, 0 after fill, `None` when unknown
    pub dominant_sentiment: Option<i8>,
}

impl TimeBucket {
    /// Creates an empty bucket.
    #[must_use]
    pub fn empty(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            item_count: 0,
            dominant_sentiment: None,
        }
    }
}

/// Per-bucket sentiment statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    /// Mean sentiment value, in [-1, 1]
    pub avg_sentiment: f64,
    /// (positive - negative) / total, in [-1, 1]
    pub sentiment_ratio: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub total_posts: usize,
}

impl TrendPoint {
    /// All-zero point for an interval without items.
    #[must_use]
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            avg_sentiment: 0.0,
            sentiment_ratio: 0.0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            total_posts: 0,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_posts == 0
    }
}

/// Count and share of one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub count: usize,
    /// Percentage of all items, 0-100
    pub percentage: f64,
}

/// Overall label breakdown for a batch of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: LabelShare,
    pub negative: LabelShare,
    pub neutral: LabelShare,
    pub total: usize,
}
