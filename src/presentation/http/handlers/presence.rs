//! Presence Handler

use axum::{extract::State, Json};

use crate::application::dto::response::PresenceResponse;
use crate::startup::AppState;

/// List the usernames currently online.
pub async fn online_users(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        users: state.room.online_users(),
    })
}
