//! Forecast outputs.

use crate::error::InsufficientData;
use crate::item::SentimentLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extrapolation model used to project sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Least-squares line through the bucket series
    Linear,
    /// Recent-window anchor plus a decaying trend
    MovingAverage,
    /// Pointwise average of `Linear` and `MovingAverage`
    #[default]
    Hybrid,
}

impl ForecastMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::MovingAverage => "moving_average",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "moving_average" | "moving-average" | "ma" => Ok(Self::MovingAverage),
            "hybrid" => Ok(Self::Hybrid),
            other => anyhow::bail!("unknown forecast method: {other}"),
        }
    }
}

/// One projected point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub timestamp: DateTime<Utc>,
    pub hours_ahead: i64,
    /// Clamped to [-1, 1]
    pub predicted_sentiment_score: f64,
    /// Clamped to [-1, 1]
    pub predicted_sentiment_ratio: f64,
    pub predicted_sentiment: SentimentLabel,
    /// In [0, 1]
    pub confidence: f64,
}

/// Score and ratio observed at a point or averaged over a range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub score: f64,
    pub ratio: f64,
}

/// Coarse direction of the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// Description of the history a forecast was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub total_posts_analyzed: usize,
    /// Hours between the first and last non-empty bucket
    pub time_range_hours: f64,
    /// Last non-empty bucket
    pub current_sentiment: SentimentSnapshot,
    /// Mean over non-empty buckets
    pub average_sentiment: SentimentSnapshot,
    pub trend: SentimentTrend,
}

/// Forecast result.
///
/// `insufficient_data` is set (and `predictions` empty) when the series had
/// fewer usable buckets than the method needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: Vec<PredictionPoint>,
    pub historical_summary: Option<HistoricalSummary>,
    pub method: ForecastMethod,
    pub interval_hours: i64,
    pub insufficient_data: Option<InsufficientData>,
}

impl Forecast {
    #[must_use]
    pub const fn is_insufficient(&self) -> bool {
        self.insufficient_data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("linear".parse::<ForecastMethod>().unwrap(), ForecastMethod::Linear);
        assert_eq!(
            "moving_average".parse::<ForecastMethod>().unwrap(),
            ForecastMethod::MovingAverage
        );
        assert_eq!("HYBRID".parse::<ForecastMethod>().unwrap(), ForecastMethod::Hybrid);
        assert!("arima".parse::<ForecastMethod>().is_err());
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&ForecastMethod::MovingAverage).unwrap();
        assert_eq!(json, "\"moving_average\"");
    }

    #[test]
    fn test_default_method_is_hybrid() {
        assert_eq!(ForecastMethod::default(), ForecastMethod::Hybrid);
    }
}
