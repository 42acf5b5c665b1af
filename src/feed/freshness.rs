//! Trailing-window freshness filter
//!
//! Decides which of a poll's items are "new": published strictly less
//! than one window ago. Items without a parseable publish time are
//! never considered fresh.

use chrono::{DateTime, Duration, Utc};

use crate::models::FeedItem;

/// Select the items published within `window` before `now`.
///
/// Pure and total: preserves relative order, never fails. An item with
/// `now - published_at == window` is already stale.
pub fn select_fresh(items: &[FeedItem], now: DateTime<Utc>, window: Duration) -> Vec<FeedItem> {
    items
        .iter()
        .filter(|item| item.age(now).is_some_and(|age| age < window))
        .cloned()
        .collect()
}
