//! Social-media items before and after sentiment labelling.

use crate::traits::SentimentClassifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Normalizes a raw classifier label.
    ///
    /// Accepts both plain names and the `LABEL_n` ids emitted by
    /// sequence-classification models (`LABEL_0` negative, `LABEL_2` positive).
    /// Anything unrecognized is neutral.
    #[must_use]
    pub fn normalize(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" | "label_2" => Self::Positive,
            "negative" | "label_0" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    /// Maps a numeric sentiment value onto a label by sign.
    #[must_use]
    pub const fn from_value(value: i8) -> Self {
        if value > 0 {
            Self::Positive
        } else if value < 0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Returns the signed value: +1, -1, or 0.
    #[must_use]
    pub const fn value(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
            Self::Neutral => 0,
        }
    }

    /// Returns the label name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Classifies a score on the [-1, 1] scale using a +/-0.1 dead zone.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.1 {
            Self::Positive
        } else if score < -0.1 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of an external text classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Raw label as produced by the model
    pub label: String,
    /// Signed value in {-1, 0, 1}
    pub value: i8,
}

impl Classification {
    /// Creates a classification result.
    pub fn new(label: impl Into<String>, value: i8) -> Self {
        Self {
            label: label.into(),
            value: value.signum(),
        }
    }

    /// Neutral result used for empty or unusable text.
    #[must_use]
    pub fn neutral() -> Self {
        Self::new("neutral", 0)
    }

    /// Resolves the classification to a label.
    ///
    /// A recognized label wins; otherwise the sign of `value` decides.
    #[must_use]
    pub fn resolve(&self) -> SentimentLabel {
        match self.label.trim().to_lowercase().as_str() {
            "positive" | "label_2" | "negative" | "label_0" | "neutral" | "label_1" => {
                SentimentLabel::normalize(&self.label)
            }
            _ => SentimentLabel::from_value(self.value),
        }
    }
}

/// Item as returned by a fetcher, before validation.
///
/// Numeric fields default to zero and text fields to empty when absent.
/// `title` and `created_utc` are required for an item to be usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub id: String,
    pub title: Option<String>,
    pub selftext: String,
    pub url: String,
    /// Creation time in epoch seconds
    pub created_utc: Option<i64>,
    pub score: i64,
    pub num_comments: i64,
    pub subreddit: String,
    pub awards: i64,
}

/// Sentiment-labelled item with a resolved timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedItem {
    #[serde(default)]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment_label: SentimentLabel,
    /// Signed classifier value in {-1, 0, 1}
    pub sentiment_value: i8,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub awards: i64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
}

impl TimestampedItem {
    /// Creates an item with zero engagement and empty metadata.
    pub fn new(
        timestamp: DateTime<Utc>,
        sentiment_label: SentimentLabel,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            timestamp,
            sentiment_label,
            sentiment_value: sentiment_label.value(),
            score: 0,
            comment_count: 0,
            awards: 0,
            subreddit: String::new(),
            title: title.into(),
            selftext: String::new(),
            url: String::new(),
        }
    }

    /// Builds a labelled item from a raw item, classifying its title.
    ///
    /// Returns `None` when the raw item lacks a title or a valid timestamp.
    pub fn from_raw(raw: &RawItem, classifier: &dyn SentimentClassifier) -> Option<Self> {
        let title = raw.title.as_deref()?;
        let timestamp = DateTime::from_timestamp(raw.created_utc?, 0)?;

        let classification = classifier.classify(title);
        let label = classification.resolve();

        Some(Self {
            id: raw.id.clone(),
            timestamp,
            sentiment_label: label,
            sentiment_value: label.value(),
            score: raw.score,
            comment_count: raw.num_comments,
            awards: raw.awards,
            subreddit: raw.subreddit.clone(),
            title: title.to_string(),
            selftext: raw.selftext.clone(),
            url: raw.url.clone(),
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comment_count: i64) -> Self {
        self.comment_count = comment_count;
        self
    }

    #[must_use]
    pub fn with_awards(mut self, awards: i64) -> Self {
        self.awards = awards;
        self
    }

    #[must_use]
    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    #[must_use]
    pub fn with_selftext(mut self, selftext: impl Into<String>) -> Self {
        self.selftext = selftext.into();
        self
    }
}
