//! # Chat Relay Library
//!
//! This crate provides a real-time group chat backend with:
//! - Unary login and presence tracking
//! - Server-streamed replay of recent history
//! - Batched client message submission
//! - A bidirectional WebSocket chat stream with broadcast fan-out
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Chat entities and the concurrent room structures
//! - **Application Layer**: The room service (broadcast fan-out engine) and DTOs
//! - **Infrastructure Layer**: Optional message archive and metrics
//! - **Presentation Layer**: HTTP routes and the WebSocket chat stream
//!
//! ## Module Structure
//!
//! ```text
//! chat_relay/
//! +-- config/        Configuration management
//! +-- domain/        Messages, sessions, registry, history, presence
//! +-- application/   Room service and DTOs
//! +-- infrastructure/ Message archive and metrics
//! +-- presentation/  HTTP routes and WebSocket lifecycle
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core chat structures
pub mod domain;

// Application layer - Room orchestration
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
