pub mod config;
pub mod config_loader;
pub mod error;
pub mod forecast;
pub mod item;
pub mod topic;
pub mod traits;
pub mod trend;

pub use config::{AggregationConfig, AppConfig, ForecastConfig, TrendingConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use error::{
    validate_horizon, validate_interval, InsufficientData, PulseError, MAX_HORIZON_HOURS,
    MAX_INTERVAL_HOURS,
};
pub use forecast::{
    Forecast, ForecastMethod, HistoricalSummary, PredictionPoint, SentimentSnapshot,
    SentimentTrend,
};
pub use item::{Classification, RawItem, SentimentLabel, TimestampedItem};
pub use topic::Topic;
pub use traits::{FetchQuery, ItemFetcher, SentimentClassifier, TrendingCategory};
pub use trend::{LabelShare, SentimentDistribution, TimeBucket, TrendPoint};
