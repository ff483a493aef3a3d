pub mod aggregator;
pub mod common;
pub mod context_builder;
pub mod forecast;
pub mod pipeline;
pub mod topics;
pub mod velocity;

// Re-export aggregation
pub use aggregator::{
    aggregate, aggregate_stats, dominant_sentiment, forward_fill, sentiment_distribution,
    trim_empty, IntervalAggregator,
};

// Re-export scoring and topics
pub use topics::{
    are_topics_similar, extract_topics, merge_similar, KeywordExtractor, TopicCandidate,
    TopicExtractor,
};
pub use velocity::{
    engagement, rank_trending, recency_multiplier, score_trending, score_velocity,
    trending_window, ScoredItem,
};

// Re-export forecasting
pub use forecast::{
    combine_hybrid, forecast, forecast_items, historical_summary, observed_span_hours, Horizon,
    SentimentForecaster,
};

pub use context_builder::{ContextConfidence, SentimentContext, SentimentContextBuilder};
pub use pipeline::{SentimentPipeline, TopicAnalysis};
