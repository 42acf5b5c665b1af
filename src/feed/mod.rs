//! Feed fetching and normalization
//!
//! [`FeedReader`] fetches a syndication feed over HTTP, parses it with
//! `feed-rs`, and normalizes the first N entries into [`FeedItem`]
//! values in the feed's native (newest-first) order.

pub mod freshness;

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::FetchError;
use crate::models::FeedItem;
use crate::sanitize::{strip_markup, truncate_to_summary};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("ryze/", env!("CARGO_PKG_VERSION"));

/// HTTP feed fetcher.
pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    /// Create a new reader with the given total request timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the feed at `feed_url` and return its first `n` items.
    ///
    /// Items come back in the feed's native order, newest first by
    /// feed convention. Each item's description is stripped of markup
    /// and collapsed to a summary line.
    ///
    /// # Errors
    ///
    /// - `FetchError::Http` when the request fails
    /// - `FetchError::Timeout` when it exceeds the configured timeout
    /// - `FetchError::Status` on a non-success response
    /// - `FetchError::Parse` when the body is not a valid feed
    /// - `FetchError::InsufficientItems` when the feed holds fewer
    ///   than `n` entries
    pub async fn fetch_items(&self, feed_url: &str, n: usize) -> Result<Vec<FeedItem>, FetchError> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(map_fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(map_fetch_err)?;
        let feed = parser::parse(bytes.as_ref())?;

        if feed.entries.len() < n {
            return Err(FetchError::InsufficientItems {
                wanted: n,
                available: feed.entries.len(),
            });
        }

        let source = feed.title.map(|t| t.content).unwrap_or_default();

        let items = feed
            .entries
            .into_iter()
            .take(n)
            .map(|entry| {
                let title = entry.title.map(|t| t.content).unwrap_or_default();
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();
                let description = entry
                    .summary
                    .map(|t| t.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .map(|raw| truncate_to_summary(&strip_markup(&raw)))
                    .unwrap_or_default();

                FeedItem {
                    source: source.clone(),
                    title,
                    description,
                    link,
                    published_at: entry.published,
                }
            })
            .collect();

        Ok(items)
    }
}

fn map_fetch_err(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(e)
    }
}
