use clap::{Parser, Subcommand};

mod commands;

use commands::{AggregateArgs, ContextArgs, ForecastArgs, TrendingArgs};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Sentiment trends, trending topics and forecasts for social-media items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket labelled items into time intervals
    Aggregate(AggregateArgs),
    /// Rank trending topics by engagement velocity
    Trending(TrendingArgs),
    /// Forecast sentiment over the next hours
    Forecast(ForecastArgs),
    /// Render a plain-text sentiment report for question answering
    Context(ContextArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Aggregate(args) => commands::run_aggregate(args).await?,
        Commands::Trending(args) => commands::run_trending(args).await?,
        Commands::Forecast(args) => commands::run_forecast(args).await?,
        Commands::Context(args) => commands::run_context(args).await?,
    }

    Ok(())
}
