// Core data structures for the ryze news relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized feed entry, ready for delivery.
///
/// Constructed fresh on every fetch and never mutated afterwards. The
/// `description` is already sanitized: no markup, collapsed to a single
/// summary line when the upstream body spanned multiple lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Display title of the feed this item came from
    pub source: String,
    /// Item headline, copied verbatim
    pub title: String,
    /// Sanitized and possibly truncated body text
    pub description: String,
    /// Item URL, copied verbatim
    pub link: String,
    /// Parsed publish time; None when the feed omits it or the date
    /// could not be parsed
    pub published_at: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Age of the item relative to `now`, if it carries a publish time.
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.published_at.map(|published| now - published)
    }
}
