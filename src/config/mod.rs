//! Configuration for the ryze news relay
//!
//! All settings come from `RYZE_`-prefixed environment variables. The
//! bot token and target channel are required; everything else has a
//! default matching the deployed service. The struct is built once at
//! startup and passed into every component that needs it; there is no
//! global configuration state.

use std::time::Duration;

use crate::error::ConfigError;

/// Official League of Legends news feed
pub const DEFAULT_FEED_URL: &str = "https://na.leagueoflegends.com/en/rss.xml";

/// Items fetched per scheduled poll
const DEFAULT_FETCH_COUNT: usize = 10;

/// Seconds between polls, and the freshness window
const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Health-check server port
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Timeout for feed fetches and chat-backend requests
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (required)
    pub discord_token: String,

    /// Target Discord channel ID (required)
    pub discord_channel: String,

    /// Feed URL to poll
    pub feed_url: String,

    /// Number of items fetched per scheduled poll
    pub fetch_count: usize,

    /// Interval between scheduled polls
    pub poll_interval: Duration,

    /// Trailing window within which an item counts as new
    pub freshness_window: Duration,

    /// Port for the health-check HTTP server
    pub http_port: u16,

    /// Per-request timeout for feed fetches and message sends
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `RYZE_DISCORD_TOKEN` and `RYZE_DISCORD_CHANNEL` are required;
    /// missing either is a fatal startup error. Optional overrides:
    /// `RYZE_FEED_URL`, `RYZE_FETCH_COUNT`, `RYZE_POLL_INTERVAL_SECS`,
    /// `RYZE_FRESHNESS_WINDOW_SECS`, `RYZE_HTTP_PORT`,
    /// `RYZE_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_token = required_var("RYZE_DISCORD_TOKEN")?;
        let discord_channel = required_var("RYZE_DISCORD_CHANNEL")?;

        let feed_url =
            std::env::var("RYZE_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());

        let fetch_count = parsed_var("RYZE_FETCH_COUNT", DEFAULT_FETCH_COUNT)?;
        let poll_interval_secs = parsed_var("RYZE_POLL_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        let freshness_window_secs =
            parsed_var("RYZE_FRESHNESS_WINDOW_SECS", DEFAULT_INTERVAL_SECS)?;
        let http_port = parsed_var("RYZE_HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let request_timeout_secs =
            parsed_var("RYZE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let config = Self {
            discord_token,
            discord_channel,
            feed_url,
            fetch_count,
            poll_interval: Duration::from_secs(poll_interval_secs),
            freshness_window: Duration::from_secs(freshness_window_secs),
            http_port,
            request_timeout: Duration::from_secs(request_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord_token.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_DISCORD_TOKEN",
                reason: "token cannot be empty".to_string(),
            });
        }
        if self.discord_channel.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_DISCORD_CHANNEL",
                reason: "channel cannot be empty".to_string(),
            });
        }
        if self.fetch_count == 0 {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_FETCH_COUNT",
                reason: "must be greater than 0".to_string(),
            });
        }
        if url::Url::parse(&self.feed_url).is_err() {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_FEED_URL",
                reason: format!("not a valid URL: {}", self.feed_url),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_POLL_INTERVAL_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidVar {
                var: "RYZE_REQUEST_TIMEOUT_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn required_var(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn parsed_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        }),
    }
}
