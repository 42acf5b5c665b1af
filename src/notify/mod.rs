//! Chat delivery pipeline
//!
//! Formats feed items as embed messages and sends them to a Discord
//! channel over the bot REST API. The backend sits behind the
//! [`ChatBackend`] trait so the pipeline stays testable against a mock
//! server; [`DiscordClient`] is the production implementation.
//!
//! Delivery opens one session per batch, reverses the batch so the
//! oldest item lands first (chat reads top to bottom), and sends
//! messages strictly one at a time, stopping at the first failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DeliveryError, Error, SendError, SessionError};
use crate::models::FeedItem;

/// Discord REST API base
const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

// ============================================================================
// Message format
// ============================================================================

/// One inline field of an embed message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed-style chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    /// Top-level title: the feed's display name
    pub title: String,
    /// Top-level body: the sanitized item description
    pub description: String,
    pub fields: Vec<EmbedField>,
}

/// Build the embed for one feed item.
///
/// Field order is part of the message contract: the inline `Link`
/// field comes before the inline `Title` field.
pub fn format_item(item: &FeedItem) -> Embed {
    Embed {
        title: item.source.clone(),
        description: item.description.clone(),
        fields: vec![
            EmbedField {
                name: "Link".to_string(),
                value: item.link.clone(),
                inline: true,
            },
            EmbedField {
                name: "Title".to_string(),
                value: item.title.clone(),
                inline: true,
            },
        ],
    }
}

// ============================================================================
// Backend seam
// ============================================================================

/// An open chat-backend session, valid for one delivery batch
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send one embed to `channel`.
    async fn send_embed(&self, channel: &str, embed: &Embed) -> Result<(), SendError>;
}

/// A chat backend able to open authenticated sessions
#[async_trait]
pub trait ChatBackend: Send + Sync {
    type Session: ChatSession + 'static;

    /// Open a session, validating credentials against the backend.
    async fn open_session(&self) -> Result<Self::Session, SessionError>;
}

// ============================================================================
// Discord implementation
// ============================================================================

/// Discord REST client
pub struct DiscordClient {
    client: Client,
    token: String,
    base_url: String,
}

impl DiscordClient {
    /// Create a client against the public Discord API.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Http` if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, SessionError> {
        Self::with_base_url(token, timeout, DISCORD_API_BASE)
    }

    /// Create a client against a custom API base URL, for tests.
    pub fn with_base_url(
        token: impl Into<String>,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token: token.into(),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for DiscordClient {
    type Session = DiscordSession;

    /// Validate the bot token and hand out a session bound to it.
    async fn open_session(&self) -> Result<DiscordSession, SessionError> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.base_url))
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::AuthRejected(status.as_u16()));
        }

        Ok(DiscordSession {
            client: self.client.clone(),
            token: self.token.clone(),
            base_url: self.base_url.clone(),
        })
    }
}

/// An authenticated Discord session.
///
/// Holds no server-side state; dropping it releases the session.
pub struct DiscordSession {
    client: Client,
    token: String,
    base_url: String,
}

#[async_trait]
impl ChatSession for DiscordSession {
    async fn send_embed(&self, channel: &str, embed: &Embed) -> Result<(), SendError> {
        let body = serde_json::json!({ "embeds": [embed] });

        let response = self
            .client
            .post(format!("{}/channels/{}/messages", self.base_url, channel))
            .header("Authorization", format!("Bot {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SendError::Timeout
                } else {
                    SendError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

// ============================================================================
// Delivery pipeline
// ============================================================================

/// Deliver a batch of items to `channel`, oldest first.
///
/// `items` arrive in feed order (newest first) and are reversed so the
/// channel reads chronologically. An empty batch is a no-op and opens
/// no session. Sends are sequential and fail-fast: the first failure
/// aborts the rest of the batch.
///
/// Returns the number of messages delivered.
///
/// # Errors
///
/// - `Error::Session` when the backend session cannot be opened
/// - `Error::Delivery` when a send fails, carrying the 1-based index
///   of the failing item in send order and the count delivered so far
pub async fn deliver<B: ChatBackend>(
    backend: &B,
    items: &[FeedItem],
    channel: &str,
) -> Result<usize, Error> {
    if items.is_empty() {
        return Ok(0);
    }

    // One session for the whole batch, released when it goes out of scope
    let session = backend.open_session().await?;

    let mut delivered = 0;
    for (index, item) in items.iter().rev().enumerate() {
        let embed = format_item(item);
        if let Err(cause) = session.send_embed(channel, &embed).await {
            return Err(DeliveryError {
                index: index + 1,
                title: item.title.clone(),
                delivered,
                cause,
            }
            .into());
        }
        delivered += 1;
        tracing::debug!(title = %item.title, position = index + 1, "message delivered");
    }

    tracing::info!(count = delivered, channel = %channel, "delivery batch complete");
    Ok(delivered)
}
