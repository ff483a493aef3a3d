//! Interval aggregation of sentiment-labelled items.
//!
//! Buckets items into fixed-width, contiguous, half-open windows and derives
//! two views per window:
//!
//! - **Dominant sentiment**: majority non-neutral label, forward-filled across
//!   gaps (consumed by the time-series endpoint)
//! - **Statistics**: average sentiment, ratio and per-label counts, with empty
//!   windows reported as all-zero points (consumed by charts and the forecaster)
//!
//! Bucket membership is computed by index arithmetic on the offset from the
//! window origin, so items need not be sorted.

use chrono::{DateTime, Duration, Utc};
use pulse_core::{
    validate_interval, LabelShare, PulseError, SentimentDistribution, SentimentLabel,
    TimeBucket, TimestampedItem, TrendPoint,
};
use tracing::debug;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

// ============================================
// Dominant Sentiment
// ============================================

/// Resolves the dominant sentiment from non-neutral label counts.
///
/// Returns `None` when there are no non-neutral items. Exact ties resolve to
/// `+1`.
#[must_use]
pub fn dominant_sentiment(positive: usize, negative: usize) -> Option<i8> {
    if positive == 0 && negative == 0 {
        return None;
    }
    if positive >= negative {
        Some(1)
    } else {
        Some(-1)
    }
}

/// Replaces unknown dominant sentiments with the nearest preceding known
/// value. Leading unknowns with no predecessor become neutral (`0`).
#[must_use]
pub fn forward_fill(mut buckets: Vec<TimeBucket>) -> Vec<TimeBucket> {
    let mut last_known: Option<i8> = None;
    for bucket in &mut buckets {
        match bucket.dominant_sentiment {
            Some(value) => last_known = Some(value),
            None => bucket.dominant_sentiment = Some(last_known.unwrap_or(0)),
        }
    }
    buckets
}

/// Removes leading and trailing empty points.
///
/// A series without any non-empty point is returned unchanged.
#[must_use]
pub fn trim_empty(points: Vec<TrendPoint>) -> Vec<TrendPoint> {
    let first = points.iter().position(|p| !p.is_empty());
    let last = points.iter().rposition(|p| !p.is_empty());

    match (first, last) {
        (Some(first), Some(last)) => points[first..=last].to_vec(),
        _ => points,
    }
}

/// Computes the overall label breakdown of a batch.
#[must_use]
pub fn sentiment_distribution(items: &[TimestampedItem]) -> SentimentDistribution {
    let total = items.len();
    let count = |label: SentimentLabel| items.iter().filter(|i| i.sentiment_label == label).count();
    let share = |count: usize| LabelShare {
        count,
        percentage: if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        },
    };

    SentimentDistribution {
        positive: share(count(SentimentLabel::Positive)),
        negative: share(count(SentimentLabel::Negative)),
        neutral: share(count(SentimentLabel::Neutral)),
        total,
    }
}

// ============================================
// Interval Aggregator
// ============================================

/// Running label counts for one bucket.
#[derive(Debug, Clone, Copy, Default)]
struct BucketTally {
    positive: usize,
    negative: usize,
    neutral: usize,
    value_sum: i64,
}

impl BucketTally {
    fn add(&mut self, item: &TimestampedItem) {
        match item.sentiment_label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
        self.value_sum += i64::from(item.sentiment_value.signum());
    }

    fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Buckets items into fixed-width windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalAggregator {
    interval_hours: i64,
}

impl IntervalAggregator {
    /// Creates an aggregator with the given bucket width.
    ///
    /// # Errors
    /// Returns `PulseError::InvalidInterval` when `interval_hours` is not
    /// positive or exceeds `MAX_INTERVAL_HOURS`.
    pub fn new(interval_hours: i64) -> Result<Self, PulseError> {
        Ok(Self {
            interval_hours: validate_interval(interval_hours)?,
        })
    }

    /// Returns the bucket width in hours.
    #[must_use]
    pub const fn interval_hours(&self) -> i64 {
        self.interval_hours
    }

    /// Returns the bucket width.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::hours(self.interval_hours)
    }

    fn width_millis(&self) -> i64 {
        self.interval_hours * MILLIS_PER_HOUR
    }

    /// Number of buckets needed to cover `[start, end)`: `ceil(span / width)`.
    #[must_use]
    pub fn bucket_count(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        let span = (end - start).num_milliseconds();
        if span <= 0 {
            return 0;
        }
        let width = self.width_millis();
        usize::try_from((span + width - 1) / width).unwrap_or(0)
    }

    /// Index of the bucket holding `timestamp`, if it lies inside `[start, end)`.
    fn bucket_index(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    ) -> Option<usize> {
        if timestamp < start || timestamp >= end {
            return None;
        }
        let offset = (timestamp - start).num_milliseconds();
        usize::try_from(offset / self.width_millis()).ok()
    }

    /// Start instant of bucket `index`, saturating at the latest representable time.
    fn bucket_start(&self, start: DateTime<Utc>, index: usize) -> DateTime<Utc> {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        start
            .checked_add_signed(Duration::milliseconds(
                self.width_millis().saturating_mul(index),
            ))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn tally(
        &self,
        items: &[TimestampedItem],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<BucketTally> {
        let mut tallies = vec![BucketTally::default(); self.bucket_count(start, end)];
        let mut outside = 0usize;

        for item in items {
            match self
                .bucket_index(start, end, item.timestamp)
                .and_then(|idx| tallies.get_mut(idx))
            {
                Some(tally) => tally.add(item),
                None => outside += 1,
            }
        }

        if outside > 0 {
            debug!(outside, "items outside aggregation window ignored");
        }
        tallies
    }

    /// Buckets items and resolves the dominant sentiment per bucket, without
    /// forward fill. Buckets with no non-neutral items stay `None`.
    #[must_use]
    pub fn buckets_unfilled(
        &self,
        items: &[TimestampedItem],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<TimeBucket> {
        self.tally(items, start, end)
            .into_iter()
            .enumerate()
            .map(|(idx, tally)| {
                let bucket = TimeBucket::empty(
                    self.bucket_start(start, idx),
                    self.bucket_start(start, idx + 1),
                );
                TimeBucket {
                    item_count: tally.total(),
                    dominant_sentiment: dominant_sentiment(tally.positive, tally.negative),
                    ..bucket
                }
            })
            .collect()
    }

    /// Buckets items and forward-fills the dominant sentiment.
    ///
    /// Every returned bucket has `dominant_sentiment` in {-1, 0, 1}.
    #[must_use]
    pub fn buckets(
        &self,
        items: &[TimestampedItem],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<TimeBucket> {
        forward_fill(self.buckets_unfilled(items, start, end))
    }

    /// Computes per-bucket statistics. Empty buckets are all-zero points.
    #[must_use]
    pub fn trend_points(
        &self,
        items: &[TimestampedItem],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<TrendPoint> {
        self.tally(items, start, end)
            .into_iter()
            .enumerate()
            .map(|(idx, tally)| {
                let timestamp = self.bucket_start(start, idx);
                let total = tally.total();
                if total == 0 {
                    return TrendPoint::empty(timestamp);
                }
                let n = total as f64;
                TrendPoint {
                    timestamp,
                    avg_sentiment: tally.value_sum as f64 / n,
                    sentiment_ratio: (tally.positive as f64 - tally.negative as f64) / n,
                    positive_count: tally.positive,
                    negative_count: tally.negative,
                    neutral_count: tally.neutral,
                    total_posts: total,
                }
            })
            .collect()
    }

    /// Window spanned by the items, aligned to epoch multiples of the interval.
    ///
    /// The start is the earliest timestamp floored to a boundary; the end is
    /// one interval past the latest timestamp's floor, so every item falls
    /// inside. Returns `None` for an empty batch.
    #[must_use]
    pub fn observed_window(
        &self,
        items: &[TimestampedItem],
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min = items.iter().map(|i| i.timestamp).min()?;
        let max = items.iter().map(|i| i.timestamp).max()?;

        let floor = |ts: DateTime<Utc>| {
            let millis = ts.timestamp_millis();
            let aligned = millis - millis.rem_euclid(self.width_millis());
            DateTime::<Utc>::from_timestamp_millis(aligned)
        };

        let start = floor(min)?;
        let end = floor(max)?.checked_add_signed(self.interval())?;
        Some((start, end))
    }
}

/// Buckets items over `[window_start, window_end)` with forward-filled
/// dominant sentiment.
///
/// # Errors
/// Returns `PulseError::InvalidInterval` for an out-of-range `interval_hours`.
pub fn aggregate(
    items: &[TimestampedItem],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    interval_hours: i64,
) -> Result<Vec<TimeBucket>, PulseError> {
    let aggregator = IntervalAggregator::new(interval_hours)?;
    Ok(aggregator.buckets(items, window_start, window_end))
}

/// Per-bucket statistics over `[window_start, window_end)`.
///
/// # Errors
/// Returns `PulseError::InvalidInterval` for an out-of-range `interval_hours`.
pub fn aggregate_stats(
    items: &[TimestampedItem],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    interval_hours: i64,
) -> Result<Vec<TrendPoint>, PulseError> {
    let aggregator = IntervalAggregator::new(interval_hours)?;
    Ok(aggregator.trend_points(items, window_start, window_end))
}
