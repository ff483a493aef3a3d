//! Least-squares extrapolation.

use super::{prediction, Horizon, MIN_TRAINING_POINTS};
use crate::common::{sample_std_dev, LinearFit};
use chrono::{DateTime, Utc};
use pulse_core::{PredictionPoint, TrendPoint};

/// Buckets used to estimate forecast confidence.
const CONFIDENCE_WINDOW: usize = 5;
const MIN_CONFIDENCE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.95;

fn hours_since(origin: DateTime<Utc>, timestamp: DateTime<Utc>) -> f64 {
    (timestamp - origin).num_milliseconds() as f64 / 3_600_000.0
}

/// Confidence from the volatility of the most recent scores:
/// `clamp(1 - stdev(last 5), 0.3, 0.95)`.
fn confidence(observed: &[TrendPoint]) -> f64 {
    let recent: Vec<f64> = observed
        .iter()
        .rev()
        .take(CONFIDENCE_WINDOW)
        .map(|p| p.avg_sentiment)
        .collect();
    let volatility = sample_std_dev(&recent).unwrap_or(0.0);
    (1.0 - volatility).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Fits `avg_sentiment` and `sentiment_ratio` against hours since the first
/// observed bucket and extrapolates both over the horizon.
///
/// `observed` must contain only non-empty buckets in time order. Returns an
/// empty list below two buckets.
#[must_use]
pub fn predict(observed: &[TrendPoint], horizon: &Horizon) -> Vec<PredictionPoint> {
    if observed.len() < MIN_TRAINING_POINTS {
        return Vec::new();
    }
    let origin = observed[0].timestamp;

    let xs: Vec<f64> = observed.iter().map(|p| hours_since(origin, p.timestamp)).collect();
    let scores: Vec<f64> = observed.iter().map(|p| p.avg_sentiment).collect();
    let ratios: Vec<f64> = observed.iter().map(|p| p.sentiment_ratio).collect();

    let (Some(score_fit), Some(ratio_fit)) =
        (LinearFit::fit(&xs, &scores), LinearFit::fit(&xs, &ratios))
    else {
        return Vec::new();
    };

    let confidence = confidence(observed);

    horizon
        .steps()
        .map(|step| {
            let x = hours_since(origin, horizon.timestamp(step));
            prediction(
                horizon,
                step,
                score_fit.predict(x),
                ratio_fit.predict(x),
                confidence,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pulse_core::SentimentLabel;

    fn point(hour: i64, score: f64, ratio: f64) -> TrendPoint {
        TrendPoint {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
            avg_sentiment: score,
            sentiment_ratio: ratio,
            positive_count: 1,
            negative_count: 0,
            neutral_count: 0,
            total_posts: 1,
        }
    }

    fn horizon_after(last: &TrendPoint, hours_ahead: i64) -> Horizon {
        Horizon::new(last.timestamp, hours_ahead, 3).unwrap()
    }

    #[test]
    fn test_extrapolates_exact_line() {
        // +0.25 every 3 hours
        let observed = vec![
            point(0, -0.5, -0.5),
            point(3, -0.25, -0.25),
            point(6, 0.0, 0.0),
            point(9, 0.25, 0.25),
        ];
        let preds = predict(&observed, &horizon_after(&observed[3], 12));

        assert_eq!(preds.len(), 4);
        assert!((preds[0].predicted_sentiment_score - 0.5).abs() < 1e-9);
        assert!((preds[1].predicted_sentiment_score - 0.75).abs() < 1e-9);
        assert!((preds[2].predicted_sentiment_score - 1.0).abs() < 1e-9);
        // 1.25 clamped
        assert!((preds[3].predicted_sentiment_score - 1.0).abs() < 1e-9);
        assert!((preds[3].predicted_sentiment_ratio - 1.0).abs() < 1e-9);
        assert!(preds.iter().all(|p| p.predicted_sentiment == SentimentLabel::Positive));
    }

    #[test]
    fn test_confidence_is_constant_and_bounded() {
        let observed = vec![
            point(0, -0.5, 0.0),
            point(3, -0.25, 0.0),
            point(6, 0.0, 0.0),
            point(9, 0.25, 0.0),
        ];
        let preds = predict(&observed, &horizon_after(&observed[3], 9));

        // 1 - sample stdev of [-0.5, -0.25, 0, 0.25]
        let expected = 1.0 - (0.3125_f64 / 3.0).sqrt();
        for p in &preds {
            assert!((p.confidence - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_series_has_max_confidence() {
        let observed = vec![point(0, 0.2, 0.1), point(3, 0.2, 0.1), point(6, 0.2, 0.1)];
        let preds = predict(&observed, &horizon_after(&observed[2], 6));
        assert!(preds.iter().all(|p| (p.confidence - MAX_CONFIDENCE).abs() < 1e-12));
        assert!(preds
            .iter()
            .all(|p| (p.predicted_sentiment_score - 0.2).abs() < 1e-9));
    }

    #[test]
    fn test_volatile_series_hits_confidence_floor() {
        let observed = vec![point(0, 1.0, 1.0), point(3, -1.0, -1.0), point(6, 1.0, 1.0)];
        let preds = predict(&observed, &horizon_after(&observed[2], 3));
        assert!((preds[0].confidence - MIN_CONFIDENCE).abs() < 1e-12);
    }

    #[test]
    fn test_irregular_spacing_uses_time_offsets() {
        // Gap between hour 3 and hour 12 still lies on y = x / 30
        let observed = vec![point(0, 0.0, 0.0), point(3, 0.1, 0.1), point(12, 0.4, 0.4)];
        let preds = predict(&observed, &horizon_after(&observed[2], 3));
        assert!((preds[0].predicted_sentiment_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_yields_nothing() {
        let observed = vec![point(0, 0.5, 0.5)];
        assert!(predict(&observed, &horizon_after(&observed[0], 12)).is_empty());
    }
}
