//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::RoomService;
use crate::config::Settings;
use crate::domain::MessageArchive;
use crate::infrastructure::archive::{self, PgMessageArchive};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RoomService>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Connect the optional message archive
        let archive = connect_archive(&settings).await?;

        // Create the chat room
        let room = Arc::new(RoomService::new(&settings.room, archive));

        // Create app state
        let state = AppState {
            room,
            settings: Arc::new(settings.clone()),
        };

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Connect the message archive when one is configured
async fn connect_archive(settings: &Settings) -> Result<Option<Arc<dyn MessageArchive>>> {
    let Some(url) = settings.archive.url.as_deref().filter(|u| !u.is_empty()) else {
        tracing::info!("Message archive disabled, history is in-memory only");
        return Ok(None);
    };

    let pool = archive::create_pool(url, &settings.archive).await?;
    archive::ensure_schema(&pool).await?;
    tracing::info!("Message archive connected");

    Ok(Some(Arc::new(PgMessageArchive::new(pool))))
}
