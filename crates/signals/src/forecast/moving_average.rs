//! Decayed-trend moving average.
//!
//! The anchor is the mean score of the most recent `window_size` buckets. The
//! trend rate compares the mean of the newer half of that window with the
//! older half, and is damped by `decay^step` as the horizon grows, so
//! projections flatten out instead of running away.

use super::{prediction, Horizon, MIN_TRAINING_POINTS};
use crate::common::mean;
use pulse_core::{PredictionPoint, TrendPoint};

/// Confidence of the first projected step before decay.
const BASE_CONFIDENCE: f64 = 0.85;
/// Ratio projections move at half the score trend.
const RATIO_DAMPING: f64 = 0.5;

/// `(mean(newer half) - mean(older half)) / window_len`.
fn trend_rate(window: &[f64]) -> f64 {
    let half = window.len() / 2;
    if half == 0 {
        return 0.0;
    }
    let older = mean(&window[..half]).unwrap_or(0.0);
    let newer = mean(&window[window.len() - half..]).unwrap_or(0.0);
    (newer - older) / window.len() as f64
}

/// Projects the recent anchor forward with a geometrically decaying trend.
///
/// `observed` must contain only non-empty buckets in time order. Returns an
/// empty list below two buckets.
#[must_use]
pub fn predict(
    observed: &[TrendPoint],
    horizon: &Horizon,
    window_size: usize,
    decay: f64,
) -> Vec<PredictionPoint> {
    if observed.len() < MIN_TRAINING_POINTS {
        return Vec::new();
    }

    let recent = &observed[observed.len().saturating_sub(window_size.max(1))..];
    let scores: Vec<f64> = recent.iter().map(|p| p.avg_sentiment).collect();
    let ratios: Vec<f64> = recent.iter().map(|p| p.sentiment_ratio).collect();

    let (Some(anchor), Some(ratio_anchor)) = (mean(&scores), mean(&ratios)) else {
        return Vec::new();
    };
    let rate = trend_rate(&scores);

    horizon
        .steps()
        .map(|step| {
            let damping = decay.powi(i32::try_from(step).unwrap_or(i32::MAX));
            let drift = rate * step as f64 * damping;
            prediction(
                horizon,
                step,
                anchor + drift,
                ratio_anchor + drift * RATIO_DAMPING,
                BASE_CONFIDENCE * damping,
            )
        })
        .collect()
}
