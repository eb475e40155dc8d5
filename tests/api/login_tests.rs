//! Login and Presence API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{body_string, test_settings, TestApp};

#[tokio::test]
async fn login_marks_the_user_online() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert!(app.state.room.is_online("alice"));
}

#[tokio::test]
async fn blank_username_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/v1/auth/login", r#"{"username":""}"#)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_login_succeeds_by_default() {
    let app = TestApp::new();

    app.post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;
    let response = app
        .post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn duplicate_login_rejected_when_enforced() {
    let mut settings = test_settings();
    settings.room.reject_duplicate_logins = true;
    let app = TestApp::with_settings(settings);

    app.post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;
    let response = app
        .post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;

    // Rejection is a payload, not an HTTP error
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn presence_endpoint_lists_online_users() {
    let app = TestApp::new();

    app.post_json("/api/v1/auth/login", r#"{"username":"bob"}"#)
        .await;
    app.post_json("/api/v1/auth/login", r#"{"username":"alice"}"#)
        .await;

    let response = app.get("/api/v1/presence").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["users"], serde_json::json!(["alice", "bob"]));
}
