use crate::error::{validate_horizon, validate_interval, PulseError};
use crate::forecast::ForecastMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aggregation: AggregationConfig,
    pub trending: TrendingConfig,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Bucket width in hours
    pub interval_hours: i64,
    /// How far back from "now" items are kept
    pub time_window_hours: i64,
    /// Drop leading and trailing empty intervals from statistics output
    pub trim_empty_intervals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub top_n: usize,
    pub min_posts: usize,
    /// Items below this score are not trending candidates
    pub min_score: i64,
    /// Only items this recent are trending candidates, unless too few are
    pub time_window_hours: i64,
    pub min_keyword_length: usize,
    /// Candidate keywords considered per requested topic
    pub candidate_multiplier: usize,
    /// Items requested from the fetcher per discovery run
    pub fetch_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub hours_ahead: i64,
    pub interval_hours: i64,
    pub method: ForecastMethod,
    /// Recent buckets used by the moving-average anchor
    pub window_size: usize,
    /// Per-step decay applied to the moving-average trend and confidence
    pub decay: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            interval_hours: 3,
            time_window_hours: 48,
            trim_empty_intervals: true,
        }
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_posts: 2,
            min_score: 100,
            time_window_hours: 24,
            min_keyword_length: 3,
            candidate_multiplier: 6,
            fetch_limit: 100,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            hours_ahead: 12,
            interval_hours: 3,
            method: ForecastMethod::Hybrid,
            window_size: 5,
            decay: 0.85,
        }
    }
}

impl AppConfig {
    /// Rejects non-positive widths and horizons before anything runs.
    ///
    /// # Errors
    /// Returns a configuration `PulseError` for the first invalid value.
    pub fn validate(&self) -> Result<(), PulseError> {
        validate_interval(self.aggregation.interval_hours)?;
        validate_horizon(self.aggregation.time_window_hours)?;
        validate_horizon(self.trending.time_window_hours)?;
        validate_interval(self.forecast.interval_hours)?;
        validate_horizon(self.forecast.hours_ahead)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregation.interval_hours, 3);
        assert_eq!(config.forecast.method, ForecastMethod::Hybrid);
        assert!((config.forecast.decay - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.aggregation.interval_hours = 0;
        assert_eq!(
            config.validate(),
            Err(PulseError::InvalidInterval { hours: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_oversized_interval() {
        let mut config = AppConfig::default();
        config.forecast.interval_hours = i64::MAX;
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_rejects_zero_trending_window() {
        let mut config = AppConfig::default();
        config.trending.time_window_hours = 0;
        assert_eq!(
            config.validate(),
            Err(PulseError::InvalidHorizon { hours: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_negative_horizon() {
        let mut config = AppConfig::default();
        config.forecast.hours_ahead = -6;
        assert_eq!(
            config.validate(),
            Err(PulseError::InvalidHorizon { hours: -6 })
        );
    }
}
