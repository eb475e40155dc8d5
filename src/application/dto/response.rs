//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ChatMessage;

/// Login response: a (success, message) pair, never an HTTP error.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// One replayed or delivered chat message
#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub username: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            username: message.username.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Aggregate acknowledgement for a batch submission
#[derive(Debug, Serialize)]
pub struct BatchSendResponse {
    pub status: String,
    pub recorded: usize,
}

/// Currently online usernames
#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub users: Vec<String>,
}
