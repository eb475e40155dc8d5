//! Message Archive
//!
//! Optional PostgreSQL-backed document store for chat history. A side-effect
//! target for the fan-out engine, never a correctness dependency: with no
//! archive configured the room runs in-memory only.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::ArchiveSettings;
use crate::domain::{ChatMessage, MessageArchive};
use crate::shared::error::AppError;

/// Create a PostgreSQL connection pool for the archive
pub async fn create_pool(url: &str, settings: &ArchiveSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(url)
        .await
}

/// Create the archive table when it does not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS archived_messages (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            content TEXT NOT NULL,
            sent_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// PostgreSQL implementation of the message archive
pub struct PgMessageArchive {
    pool: PgPool,
}

impl PgMessageArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageArchive for PgMessageArchive {
    async fn record(&self, message: &ChatMessage) -> Result<(), AppError> {
        sqlx::query("INSERT INTO archived_messages (username, content, sent_at) VALUES ($1, $2, $3)")
            .bind(&message.username)
            .bind(&message.text)
            .bind(message.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
