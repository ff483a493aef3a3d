//! Engagement velocity and trending scores.
//!
//! ## Key Concepts
//!
//! - **Engagement**: `score + 2 * comments` (comments are the stronger signal)
//! - **Velocity**: engagement per hour of age, with age floored at 0.1h
//! - **Recency multiplier**: 2.0 for brand-new items decaying linearly to 1.0
//!   at 24h, never below 1.0
//! - **Trending window**: candidates must be recent, unless the window would
//!   leave a well-filled feed with almost nothing to rank
//!
//! All functions take "now" explicitly so scores are reproducible.

use chrono::{DateTime, Duration, Utc};
use pulse_core::TimestampedItem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Minimum age used in velocity computation, in hours.
pub const MIN_AGE_HOURS: f64 = 0.1;

/// In-window items needed before older items are dropped from a trending feed.
pub const MIN_WINDOW_ITEMS: usize = 10;

const VELOCITY_WEIGHT: f64 = 0.5;
const ENGAGEMENT_WEIGHT: f64 = 0.3;
const AWARD_POINTS: f64 = 10.0;
const AWARD_WEIGHT: f64 = 0.1;

/// Engagement of an item: `score + 2 * comment_count`.
#[must_use]
pub fn engagement(item: &TimestampedItem) -> f64 {
    item.score as f64 + 2.0 * item.comment_count as f64
}

/// Age of an item in hours, floored at `MIN_AGE_HOURS`.
#[must_use]
pub fn hours_old(item: &TimestampedItem, now: DateTime<Utc>) -> f64 {
    let hours = (now - item.timestamp).num_milliseconds() as f64 / 3_600_000.0;
    hours.max(MIN_AGE_HOURS)
}

/// Recency boost: `max(1, 2 - hours_old / 24)`.
#[must_use]
pub fn recency_multiplier(hours_old: f64) -> f64 {
    (2.0 - hours_old / 24.0).max(1.0)
}

/// Engagement per hour of age.
#[must_use]
pub fn score_velocity(item: &TimestampedItem, now: DateTime<Utc>) -> f64 {
    engagement(item) / hours_old(item, now)
}

/// Composite trending score.
///
/// `(0.5 * velocity + 0.3 * engagement + 0.1 * awards * 10) * recency_multiplier`
#[must_use]
pub fn score_trending(item: &TimestampedItem, now: DateTime<Utc>) -> f64 {
    let age = hours_old(item, now);
    let velocity = engagement(item) / age;

    let base = VELOCITY_WEIGHT * velocity
        + ENGAGEMENT_WEIGHT * engagement(item)
        + AWARD_WEIGHT * (item.awards as f64 * AWARD_POINTS);

    base * recency_multiplier(age)
}

/// Item together with its momentum scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: TimestampedItem,
    pub velocity: f64,
    pub trending_score: f64,
}

impl ScoredItem {
    /// Scores an item against `now`.
    #[must_use]
    pub fn score(item: TimestampedItem, now: DateTime<Utc>) -> Self {
        let velocity = score_velocity(&item, now);
        let trending_score = score_trending(&item, now);
        Self {
            item,
            velocity,
            trending_score,
        }
    }
}

/// Selects trending candidates posted within `window_hours` of `now`.
///
/// When fewer than `MIN_WINDOW_ITEMS` items are that recent but the feed
/// holds at least that many, the whole feed is kept. Either way the result
/// is ordered by velocity, highest first.
#[must_use]
pub fn trending_window(
    items: &[TimestampedItem],
    now: DateTime<Utc>,
    window_hours: i64,
) -> Vec<TimestampedItem> {
    let cutoff = Duration::try_hours(window_hours)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let recent: Vec<&TimestampedItem> =
        items.iter().filter(|item| item.timestamp >= cutoff).collect();

    let pool = if recent.len() < MIN_WINDOW_ITEMS && items.len() >= MIN_WINDOW_ITEMS {
        debug!(
            recent = recent.len(),
            total = items.len(),
            window_hours,
            "too few recent items, keeping older ones"
        );
        items.iter().collect()
    } else {
        recent
    };

    let mut kept: Vec<(f64, TimestampedItem)> = pool
        .into_iter()
        .map(|item| (score_velocity(item, now), item.clone()))
        .collect();
    kept.sort_by(|a, b| b.0.total_cmp(&a.0));
    kept.into_iter().map(|(_, item)| item).collect()
}

/// Ranks trending candidates.
///
/// Drops items scoring below `min_score`, keeps the first occurrence of each
/// non-empty id, and sorts by trending score (highest first). Ties keep input
/// order.
#[must_use]
pub fn rank_trending(
    items: &[TimestampedItem],
    now: DateTime<Utc>,
    min_score: i64,
) -> Vec<ScoredItem> {
    let mut seen: HashSet<&str> = HashSet::new();

    let mut ranked: Vec<ScoredItem> = items
        .iter()
        .filter(|item| item.score >= min_score)
        .filter(|item| item.id.is_empty() || seen.insert(item.id.as_str()))
        .map(|item| ScoredItem::score(item.clone(), now))
        .collect();

    ranked.sort_by(|a, b| b.trending_score.total_cmp(&a.trending_score));

    debug!(
        candidates = items.len(),
        ranked = ranked.len(),
        min_score,
        "ranked trending items"
    );
    ranked
}
