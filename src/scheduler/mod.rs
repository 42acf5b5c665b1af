//! Poll scheduling and pipeline orchestration
//!
//! The scheduler drives the fetch → freshness-filter → deliver cycle on
//! a fixed interval, aligned to the top of the minute when the interval
//! is a whole number of minutes. A cycle that is
//! still running when the next tick fires causes that tick to be
//! skipped (single-flight), so two cycles never interleave their
//! deliveries. Cycle errors are logged and the cycle abandoned; they
//! never take the process down.
//!
//! The one-shot backfill path lives here too: it shares the cycle's
//! fetch and delivery stages but bypasses the freshness filter.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Timelike, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Error;
use crate::feed::freshness::select_fresh;
use crate::feed::FeedReader;
use crate::notify::{deliver, ChatBackend};

// ============================================================================
// Pipeline stages
// ============================================================================

/// Run one poll cycle: fetch the most recent items, keep the ones
/// published inside the freshness window, deliver them oldest-first.
///
/// Returns the number of messages delivered (0 when nothing was fresh;
/// an empty batch opens no chat session).
pub async fn poll_cycle<B: ChatBackend>(
    config: &Config,
    reader: &FeedReader,
    backend: &B,
) -> Result<usize, Error> {
    let items = reader
        .fetch_items(&config.feed_url, config.fetch_count)
        .await?;

    // One instant per cycle so every item is judged against the same "now"
    let now = Utc::now();
    let window =
        chrono::Duration::from_std(config.freshness_window).unwrap_or(chrono::Duration::MAX);
    let fresh = select_fresh(&items, now, window);

    if fresh.is_empty() {
        tracing::debug!(fetched = items.len(), "no fresh items this cycle");
        return Ok(0);
    }

    tracing::info!(fetched = items.len(), fresh = fresh.len(), "delivering fresh items");
    deliver(backend, &fresh, &config.discord_channel).await
}

/// One-shot backfill: fetch the last `n` items and deliver all of them,
/// bypassing the freshness filter.
pub async fn notify_last_n<B: ChatBackend>(
    config: &Config,
    reader: &FeedReader,
    backend: &B,
    n: usize,
) -> Result<usize, Error> {
    let items = reader.fetch_items(&config.feed_url, n).await?;
    deliver(backend, &items, &config.discord_channel).await
}

// ============================================================================
// Scheduler
// ============================================================================

/// Recurring poll scheduler
pub struct Scheduler<B: ChatBackend> {
    config: Arc<Config>,
    reader: Arc<FeedReader>,
    backend: Arc<B>,
    /// Single-flight guard: held for the duration of one cycle
    guard: Arc<Mutex<()>>,
}

impl<B: ChatBackend + 'static> Scheduler<B> {
    pub fn new(config: Config, reader: FeedReader, backend: B) -> Self {
        Self {
            config: Arc::new(config),
            reader: Arc::new(reader),
            backend: Arc::new(backend),
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Run the scheduler until `shutdown` resolves.
    ///
    /// Ticks fire every `poll_interval`. Ticks that fire while a cycle
    /// is still in flight are skipped with a warning.
    pub async fn run(&self, shutdown: impl std::future::Future<Output = ()>) {
        let start = tokio::time::Instant::now() + self.start_delay();
        let mut interval = tokio::time::interval_at(start, self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.config.poll_interval.as_secs(),
            feed_url = %self.config.feed_url,
            "scheduler started"
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => self.spawn_cycle(),
                _ = &mut shutdown => {
                    tracing::info!("scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Delay before the first tick. Whole-minute intervals align to the
    /// next `:00` of the minute (the deployed service polled on a
    /// `0 * * * * *` cron expression); shorter intervals tick right
    /// away.
    fn start_delay(&self) -> Duration {
        let secs = self.config.poll_interval.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            delay_to_minute_boundary()
        } else {
            Duration::ZERO
        }
    }

    /// Launch one cycle as a task, unless the previous one is still
    /// holding the guard.
    fn spawn_cycle(&self) {
        let permit = match self.guard.clone().try_lock_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!("previous cycle still running, skipping this tick");
                return;
            }
        };

        let config = self.config.clone();
        let reader = self.reader.clone();
        let backend = self.backend.clone();

        tokio::spawn(async move {
            let _permit = permit;
            match poll_cycle(config.as_ref(), reader.as_ref(), backend.as_ref()).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "cycle delivered messages"),
                // Abandon the cycle; the next tick starts clean
                Err(e) => tracing::error!(error = %e, "poll cycle failed"),
            }
        });
    }
}

/// Time remaining until the next `:00` of the minute.
fn delay_to_minute_boundary() -> Duration {
    let now = Utc::now();
    let into_minute =
        u64::from(now.second()) * 1_000_000_000 + u64::from(now.nanosecond().min(999_999_999));
    Duration::from_nanos(60_000_000_000_u64.saturating_sub(into_minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DiscordClient;

    fn scheduler(poll_interval: Duration) -> Scheduler<DiscordClient> {
        let config = Config {
            discord_token: "t".to_string(),
            discord_channel: "1".to_string(),
            feed_url: "https://example.com/rss.xml".to_string(),
            fetch_count: 10,
            poll_interval,
            freshness_window: Duration::from_secs(60),
            http_port: 8000,
            request_timeout: Duration::from_secs(5),
        };
        let reader = FeedReader::new(config.request_timeout).unwrap();
        let backend = DiscordClient::new("t", config.request_timeout).unwrap();
        Scheduler::new(config, reader, backend)
    }

    #[test]
    fn test_minute_boundary_delay_in_range() {
        let delay = delay_to_minute_boundary();
        assert!(delay <= Duration::from_secs(60));
        assert!(delay > Duration::ZERO);
    }

    #[test]
    fn test_start_delay_aligns_whole_minute_intervals() {
        let delay = scheduler(Duration::from_secs(60)).start_delay();
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(60));
    }

    #[test]
    fn test_start_delay_immediate_for_sub_minute_intervals() {
        let delay = scheduler(Duration::from_millis(100)).start_delay();
        assert_eq!(delay, Duration::ZERO);
    }
}
