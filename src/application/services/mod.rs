//! Application Services

pub mod room_service;

pub use room_service::{LoginOutcome, RoomService};
