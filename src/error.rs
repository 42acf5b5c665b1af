//! Error types for the ryze news relay
//!
//! Domain-specific error enums plus a unified [`Error`] that can cross
//! module boundaries without losing detail. Only [`ConfigError`] is
//! fatal; every other kind is reported at the cycle boundary and the
//! long-running process keeps going.

use thiserror::Error;

/// Unified result type for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching and normalizing a feed
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (network failure)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("feed fetch timed out")]
    Timeout,

    /// Server responded with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    /// Feed body could not be parsed as RSS/Atom
    #[error("feed parse failed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),

    /// Feed has fewer items than requested
    #[error("feed has {available} items, {wanted} requested")]
    InsufficientItems { wanted: usize, available: usize },
}

/// Errors establishing a chat-backend session
#[derive(Error, Debug)]
pub enum SessionError {
    /// HTTP request error during session validation
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the bot credentials
    #[error("authentication rejected with status {0}")]
    AuthRejected(u16),
}

/// Cause of a single failed message send
#[derive(Error, Debug)]
pub enum SendError {
    /// HTTP request error (network failure)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Send exceeded the configured timeout
    #[error("message send timed out")]
    Timeout,

    /// Backend rejected the message
    #[error("backend returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A failed send within a delivery batch.
///
/// `index` is the 1-based position of the failing item within the batch
/// in send (oldest-first) order; `delivered` is how many messages went
/// out before the failure.
#[derive(Error, Debug)]
#[error("delivery of item {index} ({title:?}) failed after {delivered} delivered: {cause}")]
pub struct DeliveryError {
    pub index: usize,
    pub title: String,
    pub delivered: usize,
    #[source]
    pub cause: SendError,
}

/// Missing or invalid required configuration; fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// Environment variable holds an unusable value
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Unified error type for the ryze crate
#[derive(Error, Debug)]
pub enum Error {
    /// Feed unreachable, unparseable or too short
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Unable to establish a chat-backend session
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Chat backend rejected or failed to send a message
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Missing or invalid required configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Number of messages actually delivered before this error, when the
    /// information is available. The one-shot CLI path uses this to
    /// report exact partial progress.
    pub fn delivered(&self) -> usize {
        match self {
            Error::Delivery(e) => e.delivered,
            _ => 0,
        }
    }
}
