//! Forecast CLI command.

use anyhow::Result;
use clap::Args;
use pulse_core::ForecastMethod;
use pulse_signals::SentimentForecaster;

use super::{print_json, within_window, InputArgs};

/// Arguments for the forecast command.
#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Forecast horizon in hours (overrides config)
    #[arg(long)]
    pub hours_ahead: Option<i64>,

    /// Step width in hours (overrides config)
    #[arg(long)]
    pub interval_hours: Option<i64>,

    /// linear, moving_average or hybrid (overrides config)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Only use items from the last N hours before `--now` (defaults to the
    /// configured time window)
    #[arg(long)]
    pub window_hours: Option<i64>,
}

/// Runs the forecast command.
///
/// # Errors
/// Returns an error if input or config cannot be loaded, the method is
/// unknown, or the horizon or interval is not positive.
pub async fn run_forecast(args: ForecastArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let method = match args.method.as_deref() {
        Some(name) => name.parse::<ForecastMethod>()?,
        None => config.forecast.method,
    };
    let hours_ahead = args.hours_ahead.unwrap_or(config.forecast.hours_ahead);
    let interval_hours = args.interval_hours.unwrap_or(config.forecast.interval_hours);
    let window_hours = args
        .window_hours
        .unwrap_or(config.aggregation.time_window_hours);

    let now = args.input.now()?;
    let items = within_window(args.input.load_items()?, now, window_hours)?;

    let forecaster = SentimentForecaster::from_config(&config.forecast);
    let forecast = forecaster.forecast_items(&items, hours_ahead, interval_hours, method)?;

    match &forecast.insufficient_data {
        Some(missing) => tracing::warn!(%missing, "forecast skipped"),
        None => tracing::info!(
            %method,
            items = items.len(),
            predictions = forecast.predictions.len(),
            "forecast complete"
        ),
    }

    print_json(&forecast)
}
