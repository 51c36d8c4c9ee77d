/// Stremio UA - Stremio addon backend for Ukrainian streaming sites
///
/// Scrapes uakino.me and eneyida.tv on demand and serves their catalogs,
/// item metadata and playable streams through the Stremio addon protocol.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod session;
pub mod sources;

// Re-export main types for easy access
pub use crate::api::{build_router, ApiServer, AppState, ResponseCache};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Result, ScrapeError};
pub use crate::models::{ContentType, Manifest, Preview, Series, Stream, Video};
pub use crate::session::Session;
pub use crate::sources::{SourceRegistry, SourceSite};
