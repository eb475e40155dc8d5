//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32, message = "Username must be 1-32 characters"))]
    pub username: String,
}

/// One entry of a batch submission
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BatchMessage {
    #[validate(length(min = 1, max = 32, message = "Username must be 1-32 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub text: String,
}

/// Batch submission request
#[derive(Debug, Deserialize, Validate)]
pub struct BatchSendRequest {
    #[validate(
        length(min = 1, message = "At least one message is required"),
        nested
    )]
    pub messages: Vec<BatchMessage>,
}
