//! Trending CLI command.
//!
//! Ranks items by engagement velocity, extracts and merges topic keywords,
//! and prints the top topics with their co-occurring keywords.

use anyhow::Result;
use clap::Args;
use pulse_core::Topic;
use pulse_signals::{rank_trending, trending_window, TopicExtractor};
use serde::Serialize;

use super::{print_json, InputArgs};

/// Arguments for the trending command.
#[derive(Args, Debug, Clone)]
pub struct TrendingArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum number of topics (overrides config)
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Minimum posts per topic (overrides config)
    #[arg(long)]
    pub min_posts: Option<usize>,

    /// Minimum item score to be a trending candidate (overrides config)
    #[arg(long)]
    pub min_score: Option<i64>,

    /// Only rank items from the last N hours, unless too few are that recent
    /// (overrides config)
    #[arg(long)]
    pub window_hours: Option<i64>,

    /// Related keywords listed per topic
    #[arg(long, default_value = "5")]
    pub related: usize,
}

#[derive(Debug, Serialize)]
struct TrendingTopic {
    #[serde(flatten)]
    topic: Topic,
    related_keywords: Vec<String>,
}

/// Runs the trending command.
///
/// # Errors
/// Returns an error if input or config cannot be loaded.
pub async fn run_trending(args: TrendingArgs) -> Result<()> {
    let mut config = args.input.load_config()?;
    if let Some(top_n) = args.top_n {
        config.trending.top_n = top_n;
    }
    if let Some(min_posts) = args.min_posts {
        config.trending.min_posts = min_posts;
    }
    if let Some(min_score) = args.min_score {
        config.trending.min_score = min_score;
    }
    if let Some(hours) = args.window_hours {
        config.trending.time_window_hours = hours;
    }
    config.validate()?;

    let items = args.input.load_items()?;
    let now = args.input.now()?;

    let candidates = trending_window(&items, now, config.trending.time_window_hours);
    let ranked = rank_trending(&candidates, now, config.trending.min_score);
    let extractor = TopicExtractor::new(&config.trending)?;
    let topics = extractor.extract(&ranked, config.trending.top_n, config.trending.min_posts);

    tracing::info!(
        items = items.len(),
        candidates = candidates.len(),
        ranked = ranked.len(),
        topics = topics.len(),
        "trending extraction complete"
    );

    let output: Vec<TrendingTopic> = topics
        .into_iter()
        .map(|topic| TrendingTopic {
            related_keywords: extractor.related_keywords(&topic.name, &candidates, args.related),
            topic,
        })
        .collect();

    print_json(&output)
}
