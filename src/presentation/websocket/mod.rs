//! WebSocket chat stream
//!
//! The bidirectional live-chat endpoint and its connection lifecycle.

pub mod handler;
pub mod messages;

pub use handler::ws_handler;
