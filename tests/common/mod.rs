//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;

use chat_relay::application::services::RoomService;
use chat_relay::config::{ArchiveSettings, CorsSettings, RoomSettings, ServerSettings, Settings};
use chat_relay::presentation::http::routes;
use chat_relay::startup::AppState;

/// Default settings for tests: small room, no archive.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        room: RoomSettings {
            history_capacity: 50,
            outbound_capacity: 256,
            drop_policy: "newest".into(),
            max_sessions: 0,
            join_timeout_secs: 5,
            reject_duplicate_logins: false,
            max_message_length: 2000,
        },
        archive: ArchiveSettings {
            url: None,
            max_connections: 5,
            acquire_timeout: 5,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Test application wrapping the real router around in-memory state
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with default settings
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    /// Create a test application with custom settings
    pub fn with_settings(settings: Settings) -> Self {
        let room = Arc::new(RoomService::new(&settings.room, None));
        let state = AppState {
            room,
            settings: Arc::new(settings),
        };
        let router = routes::create_router(state.clone());
        Self { router, state }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Collect a response body into a string
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
