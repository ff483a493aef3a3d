//! Context CLI command.
//!
//! Prints the plain-text sentiment report an external question-answering
//! model would receive. No model is called.

use anyhow::Result;
use clap::Args;
use pulse_signals::SentimentContextBuilder;

use super::{print_json, within_window, InputArgs};

/// Arguments for the context command.
#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Topic or search phrase the items were fetched for
    #[arg(short, long)]
    pub query: String,

    /// Only use items from the last N hours before `--now` (defaults to the
    /// configured time window)
    #[arg(long)]
    pub window_hours: Option<i64>,

    /// Print the context with its metadata as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the context command.
///
/// # Errors
/// Returns an error if input or config cannot be loaded.
pub async fn run_context(args: ContextArgs) -> Result<()> {
    let config = args.input.load_config()?;
    let window_hours = args
        .window_hours
        .unwrap_or(config.aggregation.time_window_hours);

    let now = args.input.now()?;
    let items = within_window(args.input.load_items()?, now, window_hours)?;

    let context = SentimentContextBuilder::new(&args.query, window_hours).build(&items);
    tracing::info!(
        query = %args.query,
        sampled = context.sampled,
        confidence = %context.confidence,
        "context built"
    );

    if args.json {
        print_json(&context)
    } else {
        print!("{}", context.text);
        Ok(())
    }
}
