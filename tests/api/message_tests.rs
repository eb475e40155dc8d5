//! Message API Tests
//!
//! Batch submission and history replay.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{body_string, test_settings, TestApp};

#[tokio::test]
async fn batch_submission_acknowledges_once() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/messages",
            r#"{"messages":[{"username":"alice","text":"one"},{"username":"bob","text":"two"}]}"#,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["recorded"], 2);
    assert_eq!(app.state.room.history_len(), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/messages", r#"{"messages":[]}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recent_messages_replays_history_in_order() {
    let app = TestApp::new();

    app.post_json(
        "/api/v1/messages",
        r#"{"messages":[{"username":"alice","text":"first"},{"username":"alice","text":"second"}]}"#,
    )
    .await;

    let response = app.get("/api/v1/messages/recent").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/event-stream"));

    let body = body_string(response).await;
    let first = body.find("first").unwrap();
    let second = body.find("second").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn replay_respects_the_ring_capacity() {
    let mut settings = test_settings();
    settings.room.history_capacity = 2;
    let app = TestApp::with_settings(settings);

    app.post_json(
        "/api/v1/messages",
        r#"{"messages":[{"username":"a","text":"m1"},{"username":"a","text":"m2"},{"username":"a","text":"m3"}]}"#,
    )
    .await;

    let body = body_string(app.get("/api/v1/messages/recent").await).await;
    assert!(!body.contains("m1"));
    assert!(body.contains("m2"));
    assert!(body.contains("m3"));
}

#[tokio::test]
async fn replay_of_empty_history_terminates() {
    let app = TestApp::new();

    let response = app.get("/api/v1/messages/recent").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(!body.contains("data:"));
}
