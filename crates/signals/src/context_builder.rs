//! Plain-text sentiment context for question answering.
//!
//! Renders a compact report of a topic's sentiment together with a sample of
//! its most popular items, balanced across labels, for an external language
//! model to reason over.

use crate::aggregator::sentiment_distribution;
use pulse_core::{SentimentDistribution, SentimentLabel, TimestampedItem};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// How much evidence backs a rendered context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextConfidence {
    High,
    Medium,
    Low,
}

impl ContextConfidence {
    /// `high` from 20 sampled items, `medium` from 10, `low` below.
    #[must_use]
    pub const fn from_sample_size(sampled: usize) -> Self {
        if sampled >= 20 {
            Self::High
        } else if sampled >= 10 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ContextConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered context with its sampling metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentContext {
    pub text: String,
    pub total_items: usize,
    pub sampled: usize,
    pub confidence: ContextConfidence,
}

/// Builder for sentiment report contexts.
#[derive(Debug, Clone)]
pub struct SentimentContextBuilder {
    query: String,
    window_hours: i64,
    positive_samples: usize,
    negative_samples: usize,
    neutral_samples: usize,
    max_samples: usize,
    body_chars: usize,
}

impl SentimentContextBuilder {
    /// Creates a builder for `query` with default sampling.
    ///
    /// # Arguments
    /// * `query` - Topic or search phrase the items were fetched for
    /// * `window_hours` - Look-back window the items were filtered to
    #[must_use]
    pub fn new(query: impl Into<String>, window_hours: i64) -> Self {
        Self {
            query: query.into(),
            window_hours,
            positive_samples: 10,
            negative_samples: 10,
            neutral_samples: 5,
            max_samples: 30,
            body_chars: 200,
        }
    }

    /// Sets how many top items of each label are sampled.
    #[must_use]
    pub fn with_sample_sizes(mut self, positive: usize, negative: usize, neutral: usize) -> Self {
        self.positive_samples = positive;
        self.negative_samples = negative;
        self.neutral_samples = neutral;
        self
    }

    /// Caps the total number of sampled items.
    #[must_use]
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }

    /// Sets how many characters of each item body are included.
    #[must_use]
    pub fn with_body_chars(mut self, chars: usize) -> Self {
        self.body_chars = chars;
        self
    }

    fn top_by_score<'a>(
        items: &'a [TimestampedItem],
        label: SentimentLabel,
        n: usize,
    ) -> Vec<&'a TimestampedItem> {
        let mut matching: Vec<&TimestampedItem> =
            items.iter().filter(|i| i.sentiment_label == label).collect();
        matching.sort_by(|a, b| b.score.cmp(&a.score));
        matching.truncate(n);
        matching
    }

    /// Selects the sample: top items per label by score, merged and sorted by
    /// score (highest first), then capped.
    #[must_use]
    pub fn sample<'a>(&self, items: &'a [TimestampedItem]) -> Vec<&'a TimestampedItem> {
        let mut sampled = Self::top_by_score(items, SentimentLabel::Positive, self.positive_samples);
        sampled.extend(Self::top_by_score(items, SentimentLabel::Negative, self.negative_samples));
        sampled.extend(Self::top_by_score(items, SentimentLabel::Neutral, self.neutral_samples));

        sampled.sort_by(|a, b| b.score.cmp(&a.score));
        sampled.truncate(self.max_samples);
        sampled
    }

    fn render_item(&self, out: &mut String, item: &TimestampedItem) -> fmt::Result {
        write!(
            out,
            "- [{}] (Score: {}) \"{}\"",
            item.sentiment_label.as_str().to_uppercase(),
            item.score,
            item.title
        )?;
        if !item.selftext.is_empty() {
            let body: String = item.selftext.chars().take(self.body_chars).collect();
            write!(out, " - {body}...")?;
        }
        writeln!(out)
    }

    fn render(
        &self,
        distribution: &SentimentDistribution,
        sampled: &[&TimestampedItem],
    ) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "Reddit Sentiment Analysis Report for: {}", self.query)?;
        writeln!(out, "Total posts analyzed: {}", distribution.total)?;
        writeln!(out, "Time period: Last {} hours", self.window_hours)?;
        writeln!(
            out,
            "Sentiment breakdown: {} positive, {} negative, {} neutral",
            distribution.positive.count, distribution.negative.count, distribution.neutral.count
        )?;
        writeln!(out)?;
        writeln!(out, "Sample of popular Reddit posts:")?;
        writeln!(out)?;
        for item in sampled {
            self.render_item(&mut out, item)?;
        }
        Ok(out)
    }

    /// Renders the report for `items`.
    #[must_use]
    pub fn build(&self, items: &[TimestampedItem]) -> SentimentContext {
        let distribution = sentiment_distribution(items);
        let sampled = self.sample(items);

        // Writing into a String cannot fail
        let text = self.render(&distribution, &sampled).unwrap_or_default();

        SentimentContext {
            text,
            total_items: distribution.total,
            sampled: sampled.len(),
            confidence: ContextConfidence::from_sample_size(sampled.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(label: SentimentLabel, score: i64, title: &str) -> TimestampedItem {
        TimestampedItem::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), label, title)
            .with_score(score)
    }

    fn many(label: SentimentLabel, count: i64) -> Vec<TimestampedItem> {
        (0..count).map(|i| item(label, i, &format!("{label} {i}"))).collect()
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(ContextConfidence::from_sample_size(25), ContextConfidence::High);
        assert_eq!(ContextConfidence::from_sample_size(20), ContextConfidence::High);
        assert_eq!(ContextConfidence::from_sample_size(10), ContextConfidence::Medium);
        assert_eq!(ContextConfidence::from_sample_size(9), ContextConfidence::Low);
    }

    #[test]
    fn test_sample_is_balanced_and_capped() {
        let mut items = many(SentimentLabel::Positive, 15);
        items.extend(many(SentimentLabel::Negative, 15));
        items.extend(many(SentimentLabel::Neutral, 15));

        let builder = SentimentContextBuilder::new("rust", 48);
        let sampled = builder.sample(&items);

        assert_eq!(sampled.len(), 25);
        let count = |label: SentimentLabel| sampled.iter().filter(|i| i.sentiment_label == label).count();
        assert_eq!(count(SentimentLabel::Positive), 10);
        assert_eq!(count(SentimentLabel::Negative), 10);
        assert_eq!(count(SentimentLabel::Neutral), 5);
        assert!(sampled.windows(2).all(|w| w[0].score >= w[1].score));
        // Lowest positive kept is the 10th highest
        assert!(sampled
            .iter()
            .filter(|i| i.sentiment_label == SentimentLabel::Positive)
            .all(|i| i.score >= 5));

        let capped = builder.with_max_samples(12).sample(&items);
        assert_eq!(capped.len(), 12);
    }

    #[test]
    fn test_rendered_report() {
        let items = vec![
            item(SentimentLabel::Positive, 120, "Loving the new release")
                .with_selftext("Compile times are way down"),
            item(SentimentLabel::Negative, 300, "Upgrade broke my build"),
            item(SentimentLabel::Neutral, 5, "Release notes"),
        ];
        let context = SentimentContextBuilder::new("rust 2.0", 24).build(&items);
        let lines: Vec<&str> = context.text.lines().collect();

        assert_eq!(lines[0], "Reddit Sentiment Analysis Report for: rust 2.0");
        assert_eq!(lines[1], "Total posts analyzed: 3");
        assert_eq!(lines[2], "Time period: Last 24 hours");
        assert_eq!(lines[3], "Sentiment breakdown: 1 positive, 1 negative, 1 neutral");
        assert_eq!(lines[5], "Sample of popular Reddit posts:");
        assert_eq!(lines[7], "- [NEGATIVE] (Score: 300) \"Upgrade broke my build\"");
        assert_eq!(
            lines[8],
            "- [POSITIVE] (Score: 120) \"Loving the new release\" - Compile times are way down..."
        );
        assert_eq!(lines[9], "- [NEUTRAL] (Score: 5) \"Release notes\"");

        assert_eq!(context.total_items, 3);
        assert_eq!(context.sampled, 3);
        assert_eq!(context.confidence, ContextConfidence::Low);
    }

    #[test]
    fn test_body_is_truncated_by_chars() {
        let items = vec![item(SentimentLabel::Positive, 1, "t").with_selftext("é".repeat(300))];
        let context = SentimentContextBuilder::new("q", 1)
            .with_body_chars(4)
            .build(&items);
        assert!(context.text.contains("\"t\" - éééé...\n"));
    }

    #[test]
    fn test_empty_batch() {
        let context = SentimentContextBuilder::new("nothing", 48).build(&[]);
        assert_eq!(context.sampled, 0);
        assert_eq!(context.confidence, ContextConfidence::Low);
        assert!(context.text.contains("Total posts analyzed: 0"));
    }
}
