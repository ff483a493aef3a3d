//! Aggregate CLI command.
//!
//! Buckets a labelled item batch into fixed intervals and prints both the
//! forward-filled dominant sentiment and the per-interval statistics.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use pulse_core::{SentimentDistribution, TimeBucket, TimestampedItem, TrendPoint};
use pulse_signals::{sentiment_distribution, trim_empty, IntervalAggregator};
use serde::Serialize;

use super::{print_json, window_start, within_window, InputArgs};

/// Arguments for the aggregate command.
#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Bucket width in hours (overrides config)
    #[arg(long)]
    pub interval_hours: Option<i64>,

    /// Aggregate over `[now - hours, now)` instead of the items' own time range
    #[arg(long)]
    pub window_hours: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AggregateOutput {
    interval_hours: i64,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    distribution: SentimentDistribution,
    buckets: Vec<TimeBucket>,
    trend: Vec<TrendPoint>,
}

/// Runs the aggregate command.
///
/// # Errors
/// Returns an error if input or config cannot be loaded, or an interval is invalid.
pub async fn run_aggregate(args: AggregateArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let items = args.input.load_items()?;

    let interval_hours = args
        .interval_hours
        .unwrap_or(config.aggregation.interval_hours);
    let aggregator = IntervalAggregator::new(interval_hours)?;

    let window = match args.window_hours {
        Some(hours) => Some((args.input.now()?, hours)),
        None => None,
    };
    let output = summarize(
        items,
        &aggregator,
        window,
        config.aggregation.trim_empty_intervals,
    )?;

    tracing::info!(
        buckets = output.buckets.len(),
        interval_hours,
        "aggregation complete"
    );
    print_json(&output)
}

/// Aggregates over `[now - hours, now)` when a window is given, otherwise
/// over the items' own time range. Items outside the window are left out of
/// every view, the distribution included.
fn summarize(
    items: Vec<TimestampedItem>,
    aggregator: &IntervalAggregator,
    window: Option<(DateTime<Utc>, i64)>,
    trim: bool,
) -> Result<AggregateOutput> {
    let (items, bounds) = match window {
        Some((now, hours)) => (
            within_window(items, now, hours)?,
            Some((window_start(now, hours)?, now)),
        ),
        None => {
            let bounds = aggregator.observed_window(&items);
            (items, bounds)
        }
    };

    let (buckets, mut trend) = match bounds {
        Some((start, end)) => (
            aggregator.buckets(&items, start, end),
            aggregator.trend_points(&items, start, end),
        ),
        None => (Vec::new(), Vec::new()),
    };
    if trim {
        trend = trim_empty(trend);
    }

    Ok(AggregateOutput {
        interval_hours: aggregator.interval_hours(),
        window_start: bounds.map(|(start, _)| start),
        window_end: bounds.map(|(_, end)| end),
        distribution: sentiment_distribution(&items),
        buckets,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pulse_core::SentimentLabel;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap()
    }

    fn batch() -> Vec<TimestampedItem> {
        vec![
            TimestampedItem::new(now() - Duration::hours(2), SentimentLabel::Positive, "a"),
            TimestampedItem::new(now() - Duration::hours(5), SentimentLabel::Negative, "b"),
            TimestampedItem::new(now() - Duration::hours(30), SentimentLabel::Negative, "c"),
            TimestampedItem::new(now() - Duration::hours(40), SentimentLabel::Negative, "d"),
        ]
    }

    #[test]
    fn test_window_limits_distribution() {
        let aggregator = IntervalAggregator::new(3).unwrap();
        let output = summarize(batch(), &aggregator, Some((now(), 12)), false).unwrap();

        assert_eq!(output.buckets.len(), 4);
        assert_eq!(output.window_end, Some(now()));
        assert_eq!(output.distribution.total, 2);
        assert_eq!(output.distribution.positive.count, 1);
        assert_eq!(output.distribution.negative.count, 1);
        let bucketed: usize = output.buckets.iter().map(|b| b.item_count).sum();
        assert_eq!(bucketed, output.distribution.total);
    }

    #[test]
    fn test_observed_range_counts_every_item() {
        let aggregator = IntervalAggregator::new(3).unwrap();
        let output = summarize(batch(), &aggregator, None, true).unwrap();

        assert_eq!(output.distribution.total, 4);
        let bucketed: usize = output.trend.iter().map(|p| p.total_posts).sum();
        assert_eq!(bucketed, 4);
        assert!(!output.trend[0].is_empty());
    }

    #[test]
    fn test_empty_batch_has_no_window() {
        let aggregator = IntervalAggregator::new(3).unwrap();
        let output = summarize(Vec::new(), &aggregator, None, true).unwrap();

        assert!(output.window_start.is_none());
        assert!(output.buckets.is_empty());
        assert_eq!(output.distribution.total, 0);
    }
}
