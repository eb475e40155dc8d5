//! Chat message entity and archive trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A single chat message as relayed to every recipient.
///
/// Immutable once constructed. The timestamp is assigned by the server at
/// receipt, never by the client; recipients share one allocation through
/// `Arc<ChatMessage>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Name the sender supplied at stream start
    pub username: String,

    /// Message body
    pub text: String,

    /// Server receipt time
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a message stamped with the current server time.
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// External document store for message history.
///
/// A side-effect fan-out target: the room works identically with or without
/// one, and archive failures never reach the publisher.
#[async_trait]
pub trait MessageArchive: Send + Sync {
    /// Durably record one message, keyed by `(username, text, timestamp)`.
    async fn record(&self, message: &ChatMessage) -> Result<(), AppError>;

    /// Connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
