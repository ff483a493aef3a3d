use crate::item::{Classification, RawItem};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Maps free text to a discrete sentiment.
///
/// Implementations must return `Classification::neutral()` for empty input.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// Source of raw timestamped items.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    /// Fetches items for a query. An empty list is a valid answer; transport
    /// failures are returned, not swallowed.
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<RawItem>>;
}

/// What to ask a fetcher for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchQuery {
    /// Free-text search
    Search { query: String, limit: usize },
    /// Hot items from a set of communities (`None` = global popular feed)
    Trending {
        subreddits: Option<Vec<String>>,
        limit: usize,
    },
}

/// Topic categories mapped onto the communities that cover them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingCategory {
    Technology,
    Gaming,
    News,
    Entertainment,
    Sports,
    Science,
    All,
}

impl TrendingCategory {
    /// Parses a category name, falling back to `All` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "technology" => Self::Technology,
            "gaming" => Self::Gaming,
            "news" => Self::News,
            "entertainment" => Self::Entertainment,
            "sports" => Self::Sports,
            "science" => Self::Science,
            _ => Self::All,
        }
    }

    /// Communities for this category; `None` means the global popular feed.
    #[must_use]
    pub fn subreddits(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Technology => Some(&["technology", "gadgets", "apple", "android", "programming"]),
            Self::Gaming => Some(&["gaming", "Games", "pcgaming", "PS5", "xbox"]),
            Self::News => Some(&["news", "worldnews", "politics", "UpliftingNews"]),
            Self::Entertainment => Some(&["movies", "television", "Music", "netflix"]),
            Self::Sports => Some(&["sports", "nba", "nfl", "soccer", "formula1"]),
            Self::Science => Some(&["science", "space", "Futurology", "Physics"]),
            Self::All => None,
        }
    }

    /// Builds the fetch query for this category.
    #[must_use]
    pub fn query(&self, limit: usize) -> FetchQuery {
        FetchQuery::Trending {
            subreddits: self
                .subreddits()
                .map(|subs| subs.iter().map(|s| (*s).to_string()).collect()),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(TrendingCategory::parse("Gaming"), TrendingCategory::Gaming);
        assert_eq!(TrendingCategory::parse("unknown"), TrendingCategory::All);
    }

    #[test]
    fn test_all_category_uses_popular_feed() {
        assert!(TrendingCategory::All.subreddits().is_none());
        assert_eq!(
            TrendingCategory::All.query(50),
            FetchQuery::Trending {
                subreddits: None,
                limit: 50
            }
        );
    }

    #[test]
    fn test_category_query_lists_subreddits() {
        match TrendingCategory::Science.query(20) {
            FetchQuery::Trending { subreddits, limit } => {
                assert_eq!(limit, 20);
                assert_eq!(subreddits.unwrap().len(), 4);
            }
            other => panic!("unexpected query: {other:?}"),
        }
    }
}
