//! HTTP server implementation for the addon

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::{interval, Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use super::cache::ResponseCache;
use super::handlers::{self, parse_skip, strip_json};
use super::models::ApiError;
use crate::config::Config;
use crate::session::Session;
use crate::sources::{SourceRegistry, SourceSite};

const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SourceRegistry>,
    pub client: Client,
    pub cache: Arc<ResponseCache>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = Session::build_client(&config.http)?;
        Ok(Self {
            registry: Arc::new(SourceRegistry::new(&config.sources)),
            client,
            cache: Arc::new(ResponseCache::new(config.cache.clone())),
            config: Arc::new(config),
        })
    }

    fn site(&self, key: &str) -> Option<Arc<dyn SourceSite>> {
        self.registry.get(key)
    }
}

/// Addon routes with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    // Stremio clients fetch from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/:source/manifest.json", get(manifest_handler))
        .route("/:source/catalog/:type/:id", get(catalog_handler))
        .route("/:source/catalog/:type/:id/:extra", get(catalog_extra_handler))
        .route("/:source/meta/:type/*id", get(meta_handler))
        .route("/:source/stream/:type/*id", get(stream_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server on the configured address
pub async fn start_http_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🌐 Addon server listening on http://{}", addr);
    for key in state.registry.keys() {
        info!("🔗 Manifest: http://{}/{}/manifest.json", addr, key);
    }
    serve(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let cache = state.cache.clone();
    tokio::spawn(async move {
        let mut ticker = interval(CACHE_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            cache.cleanup_expired().await;
        }
    });

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn respond(result: Result<Value>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            error!("Request failed: {}", e);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, Json(ApiError { error: e.to_string() })).into_response()
        }
    }
}

fn unknown_source(source: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiError::unknown_source(source))).into_response()
}

async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::service_info(&state))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    respond(handlers::health_check(&state).await)
}

async fn manifest_handler(State(state): State<AppState>, Path(source): Path<String>) -> Response {
    let Some(site) = state.site(&source) else {
        return unknown_source(&source);
    };
    respond(handlers::manifest(&state, site.as_ref()).await)
}

async fn catalog_handler(
    State(state): State<AppState>,
    Path((source, content_type, id)): Path<(String, String, String)>,
) -> Response {
    let Some(site) = state.site(&source) else {
        return unknown_source(&source);
    };
    respond(handlers::catalog(&state, site.as_ref(), &content_type, strip_json(&id), None).await)
}

async fn catalog_extra_handler(
    State(state): State<AppState>,
    Path((source, content_type, id, extra)): Path<(String, String, String, String)>,
) -> Response {
    let Some(site) = state.site(&source) else {
        return unknown_source(&source);
    };
    let skip = parse_skip(&extra);
    respond(handlers::catalog(&state, site.as_ref(), &content_type, &id, skip).await)
}

async fn meta_handler(
    State(state): State<AppState>,
    Path((source, content_type, id)): Path<(String, String, String)>,
) -> Response {
    let Some(site) = state.site(&source) else {
        return unknown_source(&source);
    };
    let id = strip_json(id.trim_start_matches('/'));
    respond(handlers::meta(&state, site.as_ref(), &content_type, id).await)
}

async fn stream_handler(
    State(state): State<AppState>,
    Path((source, content_type, id)): Path<(String, String, String)>,
) -> Response {
    let Some(site) = state.site(&source) else {
        return unknown_source(&source);
    };
    let id = strip_json(id.trim_start_matches('/'));
    respond(handlers::streams(&state, site.as_ref(), &content_type, id).await)
}

async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: "Not found".to_string(),
        }),
    )
}
