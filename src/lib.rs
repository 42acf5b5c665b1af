//! ryze - League of Legends news relay
//!
//! Polls the official League of Legends RSS feed, filters for items
//! published since the last poll, and posts them to a Discord channel
//! as embed messages. Also exposes a liveness endpoint and a one-shot
//! CLI mode that backfills the N most recent items on demand.
//!
//! # Architecture
//!
//! - [`config`] - Environment-sourced configuration
//! - [`models`] - Core data structures
//! - [`sanitize`] - Markup stripping and summary truncation
//! - [`feed`] - Feed fetching, normalization, freshness filtering
//! - [`notify`] - Discord client and the delivery pipeline
//! - [`scheduler`] - Recurring poll cycle and the one-shot backfill
//! - [`server`] - Liveness HTTP endpoint
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use ryze::config::Config;
//! use ryze::feed::FeedReader;
//! use ryze::notify::DiscordClient;
//! use ryze::scheduler;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let reader = FeedReader::new(config.request_timeout)?;
//!     let backend = DiscordClient::new(config.discord_token.as_str(), config.request_timeout)?;
//!     let sent = scheduler::notify_last_n(&config, &reader, &backend, 5).await?;
//!     println!("delivered {sent} items");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod sanitize;
pub mod scheduler;
pub mod server;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{DeliveryError, Error, FetchError, Result, SessionError};
    pub use crate::feed::FeedReader;
    pub use crate::models::FeedItem;
    pub use crate::notify::{ChatBackend, DiscordClient};
}

// Direct re-export for convenience
pub use models::FeedItem;
