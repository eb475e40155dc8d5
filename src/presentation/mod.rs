//! Presentation layer - HTTP routes, middleware, and the WebSocket chat stream.

pub mod http;
pub mod middleware;
pub mod websocket;
