//! CLI commands for sentiment analytics over labelled item batches.

pub mod aggregate;
pub mod context;
pub mod forecast;
pub mod trending;

pub use aggregate::{run_aggregate, AggregateArgs};
pub use context::{run_context, ContextArgs};
pub use forecast::{run_forecast, ForecastArgs};
pub use trending::{run_trending, TrendingArgs};

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use pulse_core::{validate_horizon, AppConfig, ConfigLoader, TimestampedItem, DEFAULT_CONFIG_PATH};
use serde::Serialize;

/// Input and configuration shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file holding an array of labelled items
    #[arg(short, long)]
    pub input: PathBuf,

    /// Config file path
    #[arg(short, long, env = "PULSE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Profile overlay (loads `Pulse.<profile>.toml` next to the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Reference time in RFC 3339 (defaults to the current time)
    #[arg(long)]
    pub now: Option<String>,
}

impl InputArgs {
    /// Loads and validates configuration.
    ///
    /// # Errors
    /// Returns an error if the config cannot be parsed or is invalid.
    pub fn load_config(&self) -> Result<AppConfig> {
        match &self.profile {
            Some(profile) => ConfigLoader::load_with_profile(&self.config, profile),
            None => ConfigLoader::load_from(&self.config),
        }
    }

    /// Reads the item batch.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON item array.
    pub fn load_items(&self) -> Result<Vec<TimestampedItem>> {
        let raw = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let items: Vec<TimestampedItem> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON array of items", self.input.display()))?;
        tracing::info!(items = items.len(), path = %self.input.display(), "loaded items");
        Ok(items)
    }

    /// Resolves the reference time once for the whole command.
    ///
    /// # Errors
    /// Returns an error if `--now` is not valid RFC 3339.
    pub fn now(&self) -> Result<DateTime<Utc>> {
        parse_now(self.now.as_deref())
    }
}

/// Parses an RFC 3339 timestamp, falling back to the current time.
///
/// # Errors
/// Returns an error if `value` is present but malformed.
pub fn parse_now(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --now timestamp: {s}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Start of the window `[now - hours, now)`.
///
/// # Errors
/// Returns an error if `hours` is out of range or the start is not representable.
pub fn window_start(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    let hours = validate_horizon(hours).context("invalid window")?;
    now.checked_sub_signed(Duration::hours(hours))
        .with_context(|| format!("window of {hours}h before {now} is out of range"))
}

/// Keeps items inside `[now - hours, now)`.
///
/// # Errors
/// Returns an error if `hours` is out of range.
pub fn within_window(
    items: Vec<TimestampedItem>,
    now: DateTime<Utc>,
    hours: i64,
) -> Result<Vec<TimestampedItem>> {
    let start = window_start(now, hours)?;
    Ok(items
        .into_iter()
        .filter(|item| item.timestamp >= start && item.timestamp < now)
        .collect())
}

/// Writes a value to stdout as pretty JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
