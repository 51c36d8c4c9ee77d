//! API module for the addon
//!
//! Serves the Stremio addon protocol for every registered source under
//! `/{source}/...`, plus `/` and `/health`.

use anyhow::Result;
use tracing::info;

use crate::config::Config;

pub mod cache;
pub mod handlers;
pub mod models;
pub mod server;

pub use cache::{CacheKind, CacheStats, ResponseCache};
pub use server::{build_router, AppState};

/// Addon HTTP server
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Create a new server from configuration
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Start the server and run until it fails
    pub async fn start(self) -> Result<()> {
        info!(
            "🚀 Starting addon server on {}:{}",
            self.state.config.server.host, self.state.config.server.port
        );
        server::start_http_server(self.state).await
    }
}
