//! Error taxonomy for the analytics core.
//!
//! Per-item defects never surface here: malformed items are skipped by the
//! stage that encounters them. These variants cover configuration mistakes
//! caught at the boundary and batch-level outcomes the caller must be able to
//! tell apart from success.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest accepted bucket interval: ten years.
pub const MAX_INTERVAL_HOURS: i64 = 24 * 365 * 10;

/// Longest accepted forecast horizon or lookback window: ten years.
pub const MAX_HORIZON_HOURS: i64 = 24 * 365 * 10;

/// Too few usable observations to produce a result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("insufficient data: need at least {required} usable points, got {available}")]
pub struct InsufficientData {
    /// Minimum number of usable points required
    pub required: usize,
    /// Number of usable points that were available
    pub available: usize,
}

impl InsufficientData {
    /// Creates a new insufficient-data marker.
    #[must_use]
    pub const fn new(required: usize, available: usize) -> Self {
        Self {
            required,
            available,
        }
    }
}

/// Errors produced by the analytics core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PulseError {
    /// Bucket interval width was not in `1..=MAX_INTERVAL_HOURS`.
    #[error("invalid interval: {hours}h (must be between 1 and {max})", max = MAX_INTERVAL_HOURS)]
    InvalidInterval { hours: i64 },

    /// Forecast horizon or window was not in `1..=MAX_HORIZON_HOURS`.
    #[error("invalid horizon: {hours}h (must be between 1 and {max})", max = MAX_HORIZON_HOURS)]
    InvalidHorizon { hours: i64 },

    /// Not enough data to compute the requested view.
    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),

    /// The injected fetcher failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl PulseError {
    /// Returns true for errors caused by invalid configuration values.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidInterval { .. } | Self::InvalidHorizon { .. })
    }
}

/// Validates a bucket interval width in hours.
///
/// # Errors
/// Returns `PulseError::InvalidInterval` when `hours` is not positive or
/// exceeds `MAX_INTERVAL_HOURS`.
pub fn validate_interval(hours: i64) -> Result<i64, PulseError> {
    if !(1..=MAX_INTERVAL_HOURS).contains(&hours) {
        return Err(PulseError::InvalidInterval { hours });
    }
    Ok(hours)
}

/// Validates a forecast horizon in hours.
///
/// # Errors
/// Returns `PulseError::InvalidHorizon` when `hours` is not positive or
/// exceeds `MAX_HORIZON_HOURS`.
pub fn validate_horizon(hours: i64) -> Result<i64, PulseError> {
    if !(1..=MAX_HORIZON_HOURS).contains(&hours) {
        return Err(PulseError::InvalidHorizon { hours });
    }
    Ok(hours)
}
