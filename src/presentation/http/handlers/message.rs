//! Message Handlers
//!
//! History replay and batch submission.

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures::stream::{self, Stream};
use validator::Validate;

use crate::application::dto::request::BatchSendRequest;
use crate::application::dto::response::{BatchSendResponse, ChatMessageResponse};
use crate::domain::ChatMessage;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Replay the recent-message ring as a finite server-sent event stream.
///
/// One event per buffered message, oldest first. The stream ends once the
/// snapshot is exhausted and does not subscribe the caller to live traffic.
pub async fn recent_messages(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let snapshot = state.room.recent_messages();
    let events = snapshot.into_iter().map(|message| {
        Event::default()
            .event("message")
            .json_data(ChatMessageResponse::from(message.as_ref()))
    });
    Sse::new(stream::iter(events))
}

/// Accept a batch of messages and acknowledge once with an aggregate status.
///
/// Each entry lands in history (and the archive when configured); batch
/// submission never fans out to live sessions.
pub async fn send_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchSendRequest>,
) -> Result<Json<BatchSendResponse>, AppError> {
    // Validate request
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut recorded = 0;
    for entry in body.messages {
        state
            .room
            .record(ChatMessage::new(entry.username, entry.text))
            .await;
        recorded += 1;
    }

    Ok(Json(BatchSendResponse {
        status: format!("recorded {recorded} messages"),
        recorded,
    }))
}
