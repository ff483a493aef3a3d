//! Short-horizon sentiment forecasting.
//!
//! ## Key Concepts
//!
//! - **Training set**: only buckets that had observations; empty buckets in
//!   the trend series are skipped before fitting
//! - **Linear**: least-squares line over time, constant confidence derived
//!   from recent volatility
//! - **Moving average**: recent anchor plus a trend damped by `decay^step`,
//!   confidence decaying geometrically with the horizon
//! - **Hybrid**: pointwise average of both, labelled by the linear projection
//!
//! Every projected score and ratio is clamped to [-1, 1]. Too little history
//! is reported through `Forecast::insufficient_data`, never as an error.

pub mod linear;
pub mod moving_average;

use crate::aggregator::IntervalAggregator;
use chrono::{DateTime, Duration, Utc};
use pulse_core::{
    validate_horizon, validate_interval, Forecast, ForecastConfig, ForecastMethod,
    HistoricalSummary, InsufficientData, PredictionPoint, PulseError, SentimentLabel,
    SentimentSnapshot, SentimentTrend, TimestampedItem, TrendPoint,
};
use tracing::debug;

/// Non-empty buckets needed before any method produces output.
pub const MIN_TRAINING_POINTS: usize = 2;

// ============================================
// Horizon
// ============================================

/// Future steps to project, anchored at the last bucket of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    origin: DateTime<Utc>,
    interval_hours: i64,
    steps: usize,
}

impl Horizon {
    /// Creates a horizon of `floor(hours_ahead / interval_hours)` steps.
    ///
    /// # Errors
    /// Returns `PulseError::InvalidInterval` or `PulseError::InvalidHorizon`
    /// for non-positive or oversized values.
    pub fn new(
        origin: DateTime<Utc>,
        hours_ahead: i64,
        interval_hours: i64,
    ) -> Result<Self, PulseError> {
        let interval_hours = validate_interval(interval_hours)?;
        let hours_ahead = validate_horizon(hours_ahead)?;
        Ok(Self {
            origin,
            interval_hours,
            steps: usize::try_from(hours_ahead / interval_hours).unwrap_or(0),
        })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Step numbers, starting at 1.
    pub fn steps(&self) -> impl Iterator<Item = usize> {
        1..=self.steps
    }

    /// Hours between the origin and `step`.
    #[must_use]
    pub fn hours_ahead(&self, step: usize) -> i64 {
        i64::try_from(step).unwrap_or(i64::MAX).saturating_mul(self.interval_hours)
    }

    /// Instant of `step`, saturating at the latest representable time.
    #[must_use]
    pub fn timestamp(&self, step: usize) -> DateTime<Utc> {
        Duration::try_hours(self.hours_ahead(step))
            .and_then(|offset| self.origin.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Builds a clamped, labelled prediction for `step`.
pub(crate) fn prediction(
    horizon: &Horizon,
    step: usize,
    score: f64,
    ratio: f64,
    confidence: f64,
) -> PredictionPoint {
    let score = score.clamp(-1.0, 1.0);
    PredictionPoint {
        timestamp: horizon.timestamp(step),
        hours_ahead: horizon.hours_ahead(step),
        predicted_sentiment_score: score,
        predicted_sentiment_ratio: ratio.clamp(-1.0, 1.0),
        predicted_sentiment: SentimentLabel::from_score(score),
        confidence: confidence.clamp(0.0, 1.0),
    }
}

/// Averages two forecasts pointwise. The label follows `linear`.
///
/// When one side is empty the other is returned unchanged.
#[must_use]
pub fn combine_hybrid(
    linear: Vec<PredictionPoint>,
    moving_average: Vec<PredictionPoint>,
) -> Vec<PredictionPoint> {
    if linear.is_empty() {
        return moving_average;
    }
    if moving_average.is_empty() {
        return linear;
    }

    linear
        .into_iter()
        .zip(moving_average)
        .map(|(lin, ma)| PredictionPoint {
            predicted_sentiment_score: (lin.predicted_sentiment_score
                + ma.predicted_sentiment_score)
                / 2.0,
            predicted_sentiment_ratio: (lin.predicted_sentiment_ratio
                + ma.predicted_sentiment_ratio)
                / 2.0,
            confidence: (lin.confidence + ma.confidence) / 2.0,
            ..lin
        })
        .collect()
}

// ============================================
// Historical Summary
// ============================================

/// Summarizes the non-empty buckets of a trend series.
///
/// Without item timestamps the time range runs from the first to the last
/// non-empty bucket start. Returns `None` when no bucket had observations.
#[must_use]
pub fn historical_summary(series: &[TrendPoint]) -> Option<HistoricalSummary> {
    let observed: Vec<&TrendPoint> = series.iter().filter(|p| !p.is_empty()).collect();
    let first = *observed.first()?;
    let last = *observed.last()?;

    let n = observed.len() as f64;
    let average = SentimentSnapshot {
        score: observed.iter().map(|p| p.avg_sentiment).sum::<f64>() / n,
        ratio: observed.iter().map(|p| p.sentiment_ratio).sum::<f64>() / n,
    };

    let trend = if observed.len() < 2 || last.avg_sentiment == first.avg_sentiment {
        SentimentTrend::Stable
    } else if last.avg_sentiment > first.avg_sentiment {
        SentimentTrend::Increasing
    } else {
        SentimentTrend::Decreasing
    };

    Some(HistoricalSummary {
        total_posts_analyzed: observed.iter().map(|p| p.total_posts).sum(),
        time_range_hours: (last.timestamp - first.timestamp).num_milliseconds() as f64
            / 3_600_000.0,
        current_sentiment: SentimentSnapshot {
            score: last.avg_sentiment,
            ratio: last.sentiment_ratio,
        },
        average_sentiment: average,
        trend,
    })
}

/// Hours between the earliest and latest item, `None` for an empty batch.
#[must_use]
pub fn observed_span_hours(items: &[TimestampedItem]) -> Option<f64> {
    let first = items.iter().map(|i| i.timestamp).min()?;
    let last = items.iter().map(|i| i.timestamp).max()?;
    Some((last - first).num_milliseconds() as f64 / 3_600_000.0)
}

// ============================================
// Forecaster
// ============================================

/// Projects future sentiment from a bucketed trend series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentForecaster {
    window_size: usize,
    decay: f64,
}

impl Default for SentimentForecaster {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl SentimentForecaster {
    /// Creates a forecaster with the moving-average window and decay.
    #[must_use]
    pub const fn new(window_size: usize, decay: f64) -> Self {
        Self { window_size, decay }
    }

    #[must_use]
    pub const fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.window_size, config.decay)
    }

    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    #[must_use]
    pub const fn decay(&self) -> f64 {
        self.decay
    }

    /// Forecasts `floor(hours_ahead / interval_hours)` points past the last
    /// bucket of `series`.
    ///
    /// # Errors
    /// Returns a configuration error for a non-positive horizon or interval.
    /// Short or empty series are not errors: the result carries
    /// `insufficient_data` and no predictions.
    pub fn forecast(
        &self,
        series: &[TrendPoint],
        hours_ahead: i64,
        interval_hours: i64,
        method: ForecastMethod,
    ) -> Result<Forecast, PulseError> {
        validate_interval(interval_hours)?;
        validate_horizon(hours_ahead)?;

        let observed: Vec<TrendPoint> = series.iter().filter(|p| !p.is_empty()).cloned().collect();
        let historical_summary = historical_summary(series);

        let mut forecast = Forecast {
            predictions: Vec::new(),
            historical_summary,
            method,
            interval_hours,
            insufficient_data: None,
        };

        let origin = series.iter().map(|p| p.timestamp).max();
        let Some(origin) = origin.filter(|_| observed.len() >= MIN_TRAINING_POINTS) else {
            debug!(
                buckets = series.len(),
                observed = observed.len(),
                "not enough history to forecast"
            );
            forecast.insufficient_data =
                Some(InsufficientData::new(MIN_TRAINING_POINTS, observed.len()));
            return Ok(forecast);
        };

        let horizon = Horizon::new(origin, hours_ahead, interval_hours)?;
        forecast.predictions = match method {
            ForecastMethod::Linear => linear::predict(&observed, &horizon),
            ForecastMethod::MovingAverage => {
                moving_average::predict(&observed, &horizon, self.window_size, self.decay)
            }
            ForecastMethod::Hybrid => combine_hybrid(
                linear::predict(&observed, &horizon),
                moving_average::predict(&observed, &horizon, self.window_size, self.decay),
            ),
        };

        debug!(
            method = %method,
            observed = observed.len(),
            predictions = forecast.predictions.len(),
            "sentiment forecast computed"
        );
        Ok(forecast)
    }

    /// Forecasts `series`, built from `items`, measuring the summary's time
    /// range between the earliest and latest item.
    ///
    /// # Errors
    /// Same as [`SentimentForecaster::forecast`].
    pub fn forecast_with_items(
        &self,
        series: &[TrendPoint],
        items: &[TimestampedItem],
        hours_ahead: i64,
        interval_hours: i64,
        method: ForecastMethod,
    ) -> Result<Forecast, PulseError> {
        let mut forecast = self.forecast(series, hours_ahead, interval_hours, method)?;
        if let (Some(summary), Some(span)) = (
            forecast.historical_summary.as_mut(),
            observed_span_hours(items),
        ) {
            summary.time_range_hours = span;
        }
        Ok(forecast)
    }

    /// Aggregates items over their observed window and forecasts the result.
    ///
    /// # Errors
    /// Returns a configuration error for a non-positive horizon or interval.
    pub fn forecast_items(
        &self,
        items: &[TimestampedItem],
        hours_ahead: i64,
        interval_hours: i64,
        method: ForecastMethod,
    ) -> Result<Forecast, PulseError> {
        let aggregator = IntervalAggregator::new(interval_hours)?;
        let series = aggregator
            .observed_window(items)
            .map(|(start, end)| aggregator.trend_points(items, start, end))
            .unwrap_or_default();
        self.forecast_with_items(&series, items, hours_ahead, interval_hours, method)
    }
}

/// Forecasts with the default moving-average window and decay.
///
/// # Errors
/// Returns a configuration error for a non-positive horizon or interval.
pub fn forecast(
    series: &[TrendPoint],
    hours_ahead: i64,
    interval_hours: i64,
    method: ForecastMethod,
) -> Result<Forecast, PulseError> {
    SentimentForecaster::default().forecast(series, hours_ahead, interval_hours, method)
}

/// Builds a trend series from items and forecasts it with default settings.
///
/// # Errors
/// Returns a configuration error for a non-positive horizon or interval.
pub fn forecast_items(
    items: &[TimestampedItem],
    hours_ahead: i64,
    interval_hours: i64,
    method: ForecastMethod,
) -> Result<Forecast, PulseError> {
    SentimentForecaster::default().forecast_items(items, hours_ahead, interval_hours, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn origin() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn point(hour: i64, score: f64, posts: usize) -> TrendPoint {
        if posts == 0 {
            return TrendPoint::empty(origin() + Duration::hours(hour));
        }
        TrendPoint {
            timestamp: origin() + Duration::hours(hour),
            avg_sentiment: score,
            sentiment_ratio: score,
            positive_count: posts,
            negative_count: 0,
            neutral_count: 0,
            total_posts: posts,
        }
    }

    fn rising_series() -> Vec<TrendPoint> {
        vec![
            point(0, -0.2, 2),
            point(3, 0.0, 0),
            point(6, 0.1, 3),
            point(9, 0.2, 1),
            point(12, 0.35, 4),
            point(15, 0.0, 0),
        ]
    }

    #[test]
    fn test_single_bucket_is_insufficient() {
        let series = vec![point(0, 0.0, 0), point(3, 0.5, 4), point(6, 0.0, 0)];
        let result = forecast(&series, 12, 3, ForecastMethod::Hybrid).unwrap();

        assert!(result.predictions.is_empty());
        assert!(result.is_insufficient());
        assert_eq!(result.insufficient_data, Some(InsufficientData::new(2, 1)));
        let summary = result.historical_summary.unwrap();
        assert_eq!(summary.total_posts_analyzed, 4);
        assert_eq!(summary.trend, SentimentTrend::Stable);
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let result = forecast(&[], 12, 3, ForecastMethod::Linear).unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.insufficient_data, Some(InsufficientData::new(2, 0)));
        assert!(result.historical_summary.is_none());
    }

    #[test]
    fn test_configuration_errors() {
        let series = rising_series();
        assert_eq!(
            forecast(&series, 12, 0, ForecastMethod::Hybrid),
            Err(PulseError::InvalidInterval { hours: 0 })
        );
        assert_eq!(
            forecast(&series, -1, 3, ForecastMethod::Hybrid),
            Err(PulseError::InvalidHorizon { hours: -1 })
        );
        // Rejected even when there is nothing to forecast
        assert!(forecast(&[], 0, 3, ForecastMethod::Hybrid).is_err());
    }

    #[test]
    fn test_oversized_horizon_and_interval_are_rejected() {
        let series = rising_series();
        assert_eq!(
            forecast(&series, 10_000_000_000_000, 1_000_000_000_000, ForecastMethod::Hybrid),
            Err(PulseError::InvalidInterval {
                hours: 1_000_000_000_000
            })
        );
        assert_eq!(
            forecast(&series, i64::MAX, 1, ForecastMethod::Linear),
            Err(PulseError::InvalidHorizon { hours: i64::MAX })
        );
        assert!(forecast_items(&[], i64::MAX, 3, ForecastMethod::Linear).is_err());
    }

    #[test]
    fn test_horizon_timestamp_saturates() {
        let end = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        let horizon = Horizon::new(end, 6, 3).unwrap();
        assert_eq!(horizon.timestamp(2), DateTime::<Utc>::MAX_UTC);
        assert_eq!(horizon.hours_ahead(2), 6);
    }

    #[test]
    fn test_point_count_and_timestamps() {
        let series = rising_series();
        let result = forecast(&series, 10, 3, ForecastMethod::Hybrid).unwrap();

        assert_eq!(result.predictions.len(), 3);
        assert_eq!(result.interval_hours, 3);
        assert_eq!(result.method, ForecastMethod::Hybrid);
        // Anchored at the last bucket of the series, including trailing empties
        let hours: Vec<i64> = result.predictions.iter().map(|p| p.hours_ahead).collect();
        assert_eq!(hours, vec![3, 6, 9]);
        assert_eq!(result.predictions[0].timestamp, origin() + Duration::hours(18));
        assert_eq!(result.predictions[2].timestamp, origin() + Duration::hours(24));
    }

    #[test]
    fn test_horizon_shorter_than_interval() {
        let result = forecast(&rising_series(), 2, 3, ForecastMethod::Linear).unwrap();
        assert!(result.predictions.is_empty());
        assert!(!result.is_insufficient());
    }

    #[test]
    fn test_hybrid_averages_both_methods() {
        let series = rising_series();
        let lin = forecast(&series, 12, 3, ForecastMethod::Linear).unwrap();
        let ma = forecast(&series, 12, 3, ForecastMethod::MovingAverage).unwrap();
        let hybrid = forecast(&series, 12, 3, ForecastMethod::Hybrid).unwrap();

        assert_eq!(hybrid.predictions.len(), 4);
        for ((h, l), m) in hybrid
            .predictions
            .iter()
            .zip(&lin.predictions)
            .zip(&ma.predictions)
        {
            let score = (l.predicted_sentiment_score + m.predicted_sentiment_score) / 2.0;
            let ratio = (l.predicted_sentiment_ratio + m.predicted_sentiment_ratio) / 2.0;
            let confidence = (l.confidence + m.confidence) / 2.0;
            assert!((h.predicted_sentiment_score - score).abs() < 1e-12);
            assert!((h.predicted_sentiment_ratio - ratio).abs() < 1e-12);
            assert!((h.confidence - confidence).abs() < 1e-12);
            assert_eq!(h.predicted_sentiment, l.predicted_sentiment);
        }
    }

    #[test]
    fn test_combine_hybrid_falls_back_to_available_side() {
        let horizon = Horizon::new(origin(), 6, 3).unwrap();
        let only = vec![
            prediction(&horizon, 1, 0.3, 0.2, 0.6),
            prediction(&horizon, 2, 0.4, 0.3, 0.6),
        ];
        assert_eq!(combine_hybrid(only.clone(), Vec::new()), only);
        assert_eq!(combine_hybrid(Vec::new(), only.clone()), only);
    }

    #[test]
    fn test_predictions_are_clamped() {
        let series = vec![
            point(0, -1.0, 5),
            point(3, -0.2, 5),
            point(6, 0.6, 5),
            point(9, 1.0, 5),
        ];
        for method in [
            ForecastMethod::Linear,
            ForecastMethod::MovingAverage,
            ForecastMethod::Hybrid,
        ] {
            let result = forecast(&series, 48, 3, method).unwrap();
            assert_eq!(result.predictions.len(), 16);
            for p in &result.predictions {
                assert!((-1.0..=1.0).contains(&p.predicted_sentiment_score));
                assert!((-1.0..=1.0).contains(&p.predicted_sentiment_ratio));
                assert!((0.0..=1.0).contains(&p.confidence));
            }
        }
    }

    #[test]
    fn test_labels_follow_thresholds() {
        let horizon = Horizon::new(origin(), 3, 3).unwrap();
        assert_eq!(
            prediction(&horizon, 1, 0.11, 0.0, 0.5).predicted_sentiment,
            SentimentLabel::Positive
        );
        assert_eq!(
            prediction(&horizon, 1, 0.1, 0.0, 0.5).predicted_sentiment,
            SentimentLabel::Neutral
        );
        assert_eq!(
            prediction(&horizon, 1, -0.5, 0.0, 0.5).predicted_sentiment,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_historical_summary() {
        let summary = historical_summary(&rising_series()).unwrap();

        assert_eq!(summary.total_posts_analyzed, 10);
        assert!((summary.time_range_hours - 12.0).abs() < 1e-12);
        assert!((summary.current_sentiment.score - 0.35).abs() < 1e-12);
        assert!((summary.average_sentiment.score - 0.1125).abs() < 1e-12);
        assert_eq!(summary.trend, SentimentTrend::Increasing);

        let falling = vec![point(0, 0.4, 1), point(3, -0.1, 1)];
        assert_eq!(
            historical_summary(&falling).map(|s| s.trend),
            Some(SentimentTrend::Decreasing)
        );
        assert!(historical_summary(&[point(0, 0.0, 0)]).is_none());
    }

    #[test]
    fn test_forecast_items_builds_series() {
        let items: Vec<TimestampedItem> = [
            (1, SentimentLabel::Negative),
            (4, SentimentLabel::Neutral),
            (7, SentimentLabel::Positive),
            (8, SentimentLabel::Positive),
        ]
        .iter()
        .map(|(hour, label)| TimestampedItem::new(origin() + Duration::hours(*hour), *label, "t"))
        .collect();

        let result = forecast_items(&items, 6, 3, ForecastMethod::Linear).unwrap();
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.historical_summary.unwrap().total_posts_analyzed, 4);
        // Last bucket starts at 06:00
        assert_eq!(result.predictions[0].timestamp, origin() + Duration::hours(9));

        let empty = forecast_items(&[], 6, 3, ForecastMethod::Linear).unwrap();
        assert!(empty.is_insufficient());
    }

    #[test]
    fn test_time_range_uses_item_timestamps() {
        let items = vec![
            TimestampedItem::new(origin() + Duration::hours(1), SentimentLabel::Positive, "a"),
            TimestampedItem::new(
                origin() + Duration::minutes(5 * 60 + 30),
                SentimentLabel::Negative,
                "b",
            ),
        ];

        let result = forecast_items(&items, 6, 3, ForecastMethod::Hybrid).unwrap();
        let summary = result.historical_summary.unwrap();
        // Buckets start at 00:00 and 03:00; items span 01:00 to 05:30
        assert!((summary.time_range_hours - 4.5).abs() < 1e-12);
        assert_eq!(observed_span_hours(&items), Some(4.5));
        assert_eq!(observed_span_hours(&[]), None);
    }

    #[test]
    fn test_forecast_is_idempotent() {
        let series = rising_series();
        let a = forecast(&series, 12, 3, ForecastMethod::Hybrid).unwrap();
        let b = forecast(&series, 12, 3, ForecastMethod::Hybrid).unwrap();
        assert_eq!(a, b);
    }
}
