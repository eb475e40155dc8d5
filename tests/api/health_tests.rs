//! Health and Metrics API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{body_string, TestApp};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn liveness_probe_is_alive() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn readiness_reports_room_state() {
    let app = TestApp::new();

    app.post_json(
        "/api/v1/messages",
        r#"{"messages":[{"username":"a","text":"hello"}]}"#,
    )
    .await;

    let response = app.get("/health/ready").await;

    // No archive configured, so the server is ready
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["room"]["buffered_messages"], 1);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = TestApp::new();

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("chat_relay_sessions_active"));
}
