//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Chat room configuration
    pub room: RoomSettings,

    /// Message archive configuration
    pub archive: ArchiveSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Chat room configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomSettings {
    /// Capacity of the recent-message ring used for replay
    pub history_capacity: usize,

    /// Per-session outbound queue capacity (0 = unbounded)
    pub outbound_capacity: usize,

    /// What to discard when an outbound queue is full: "newest" or "oldest"
    pub drop_policy: String,

    /// Ceiling on concurrently registered sessions (0 = unlimited)
    pub max_sessions: usize,

    /// How long a new connection may take to send its first frame, in seconds
    pub join_timeout_secs: u64,

    /// Reject logins for usernames that are already online
    pub reject_duplicate_logins: bool,

    /// Longest accepted message body, in characters
    pub max_message_length: usize,
}

/// Message archive (external document store) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveSettings {
    /// PostgreSQL connection URL; the archive is disabled when unset
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("room.history_capacity", 50)?
            .set_default("room.outbound_capacity", 256)?
            .set_default("room.drop_policy", "newest")?
            .set_default("room.max_sessions", 0)?
            .set_default("room.join_timeout_secs", 30)?
            .set_default("room.reject_duplicate_logins", false)?
            .set_default("room.max_message_length", 2000)?
            .set_default("archive.max_connections", 5)?
            .set_default("archive.acquire_timeout", 30)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("archive.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
