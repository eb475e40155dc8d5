//! Login Handler

use axum::{extract::State, Json};
use validator::Validate;

use crate::application::dto::request::LoginRequest;
use crate::application::dto::response::LoginResponse;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Log a user in by marking the username online.
///
/// Rejection (when duplicate enforcement is configured) is a
/// `success: false` payload, not an HTTP error.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Validate request
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username must not be blank".into()));
    }

    let outcome = state.room.login(username);

    Ok(Json(LoginResponse {
        success: outcome.accepted,
        message: outcome.message,
    }))
}
