//! End-to-end orchestration over the injected fetcher and classifier.
//!
//! The pipeline owns no I/O of its own: items come from an `ItemFetcher`,
//! labels from a `SentimentClassifier`, and "now" is always passed in so
//! results are reproducible.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use pulse_core::{
    AppConfig, FetchQuery, Forecast, InsufficientData, ItemFetcher, PulseError, RawItem,
    SentimentClassifier, SentimentDistribution, TimeBucket, TimestampedItem, Topic,
    TrendPoint, TrendingCategory,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregator::{sentiment_distribution, trim_empty, IntervalAggregator};
use crate::context_builder::{SentimentContext, SentimentContextBuilder};
use crate::forecast::SentimentForecaster;
use crate::topics::TopicExtractor;
use crate::velocity::{rank_trending, trending_window};

/// Sentiment trend and forecast for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub query: String,
    /// Items returned by the fetcher, before any filtering
    pub total_fetched: usize,
    /// Labelled items inside the analysis window
    pub posts_in_window: usize,
    pub distribution: SentimentDistribution,
    /// Forward-filled dominant sentiment per interval
    pub buckets: Vec<TimeBucket>,
    /// Per-interval statistics
    pub trend: Vec<TrendPoint>,
    pub forecast: Forecast,
}

/// Fetch, label, aggregate and forecast social-media sentiment.
pub struct SentimentPipeline {
    fetcher: Arc<dyn ItemFetcher>,
    classifier: Arc<dyn SentimentClassifier>,
    config: AppConfig,
    aggregator: IntervalAggregator,
    /// Buckets the forecast series at the forecast step width
    forecast_aggregator: IntervalAggregator,
    forecaster: SentimentForecaster,
    topics: TopicExtractor,
}

impl SentimentPipeline {
    /// Creates a pipeline.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the keyword
    /// patterns fail to compile.
    pub fn new(
        fetcher: Arc<dyn ItemFetcher>,
        classifier: Arc<dyn SentimentClassifier>,
        config: AppConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: IntervalAggregator::new(config.aggregation.interval_hours)?,
            forecast_aggregator: IntervalAggregator::new(config.forecast.interval_hours)?,
            forecaster: SentimentForecaster::from_config(&config.forecast),
            topics: TopicExtractor::new(&config.trending)?,
            fetcher,
            classifier,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Labels raw items, skipping the malformed ones.
    #[must_use]
    pub fn label_items(&self, raw: &[RawItem]) -> Vec<TimestampedItem> {
        let items: Vec<TimestampedItem> = raw
            .iter()
            .filter_map(|r| TimestampedItem::from_raw(r, self.classifier.as_ref()))
            .collect();

        let skipped = raw.len() - items.len();
        if skipped > 0 {
            debug!(skipped, "skipped malformed items");
        }
        items
    }

    /// Analysis window `[now - time_window, now)`.
    #[must_use]
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = now
            .checked_sub_signed(Duration::hours(self.config.aggregation.time_window_hours))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        (start, now)
    }

    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<RawItem>, PulseError> {
        self.fetcher.fetch(query).await.map_err(|e| {
            warn!(error = %e, "fetch failed");
            PulseError::Fetch(format!("{e:#}"))
        })
    }

    /// Fetches `query` and keeps labelled items inside the window.
    ///
    /// Returns the raw fetch count alongside the kept items.
    async fn fetch_window(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<(usize, Vec<TimestampedItem>), PulseError> {
        let raw = self
            .fetch(&FetchQuery::Search {
                query: query.to_string(),
                limit: self.config.trending.fetch_limit,
            })
            .await?;

        let (start, end) = self.window(now);
        let items: Vec<TimestampedItem> = self
            .label_items(&raw)
            .into_iter()
            .filter(|item| item.timestamp >= start && item.timestamp < end)
            .collect();

        if items.is_empty() {
            debug!(query, fetched = raw.len(), "no items inside analysis window");
            return Err(InsufficientData::new(1, 0).into());
        }
        Ok((raw.len(), items))
    }

    /// Aggregates and forecasts sentiment for `query`.
    ///
    /// The forecast series is bucketed at `forecast.interval_hours`, so its
    /// steps match the projected ones even when the display interval differs.
    ///
    /// # Errors
    /// Returns `PulseError::Fetch` if the fetcher fails and
    /// `PulseError::InsufficientData` when no items fall inside the window.
    pub async fn analyze(&self, query: &str, now: DateTime<Utc>) -> Result<TopicAnalysis, PulseError> {
        let (total_fetched, items) = self.fetch_window(query, now).await?;
        let (start, end) = self.window(now);

        let trim = self.config.aggregation.trim_empty_intervals;

        let buckets = self.aggregator.buckets(&items, start, end);
        let mut trend = self.aggregator.trend_points(&items, start, end);
        let mut series = self.forecast_aggregator.trend_points(&items, start, end);
        if trim {
            trend = trim_empty(trend);
            series = trim_empty(series);
        }

        let forecast = self.forecaster.forecast_with_items(
            &series,
            &items,
            self.config.forecast.hours_ahead,
            self.config.forecast.interval_hours,
            self.config.forecast.method,
        )?;

        info!(
            query,
            total_fetched,
            posts_in_window = items.len(),
            buckets = buckets.len(),
            predictions = forecast.predictions.len(),
            "analysis complete"
        );

        Ok(TopicAnalysis {
            query: query.to_string(),
            total_fetched,
            posts_in_window: items.len(),
            distribution: sentiment_distribution(&items),
            buckets,
            trend,
            forecast,
        })
    }

    /// Builds a question-answering context for `query`.
    ///
    /// # Errors
    /// Same as [`SentimentPipeline::analyze`].
    pub async fn context(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<SentimentContext, PulseError> {
        let (_, items) = self.fetch_window(query, now).await?;
        Ok(SentimentContextBuilder::new(query, self.config.aggregation.time_window_hours)
            .build(&items))
    }

    /// Discovers ranked trending topics for a category.
    ///
    /// # Errors
    /// Returns `PulseError::Fetch` if the fetcher fails.
    pub async fn discover_trending(
        &self,
        category: TrendingCategory,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, PulseError> {
        let raw = self
            .fetch(&category.query(self.config.trending.fetch_limit))
            .await?;
        let items = trending_window(
            &self.label_items(&raw),
            now,
            self.config.trending.time_window_hours,
        );
        let ranked = rank_trending(&items, now, self.config.trending.min_score);

        let topics = self.topics.extract(
            &ranked,
            self.config.trending.top_n,
            self.config.trending.min_posts,
        );

        info!(
            category = ?category,
            fetched = raw.len(),
            candidates = items.len(),
            ranked = ranked.len(),
            topics = topics.len(),
            "trending discovery complete"
        );
        Ok(topics)
    }

    /// Analyzes several queries concurrently.
    ///
    /// Results keep the order of `queries`; one failing query does not affect
    /// the others.
    pub async fn analyze_topics(
        &self,
        queries: &[String],
        now: DateTime<Utc>,
    ) -> Vec<(String, Result<TopicAnalysis, PulseError>)> {
        let results = join_all(queries.iter().map(|q| self.analyze(q, now))).await;
        queries.iter().cloned().zip(results).collect()
    }
}
