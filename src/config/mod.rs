//! Configuration management.

pub mod settings;

pub use settings::{ArchiveSettings, CorsSettings, RoomSettings, ServerSettings, Settings};
