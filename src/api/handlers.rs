//! API request handlers
//!
//! Each addon resource goes through the response cache first and only
//! scrapes on a miss. Empty results are never cached, so a failed scrape
//! is retried by the next request.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::cache::CacheKind;
use super::models::{ServiceInfo, SourceInfo};
use super::server::AppState;
use crate::models::{ContentType, MetaResponse, MetasResponse, StreamsResponse};
use crate::session::Session;
use crate::sources::{self, SourceSite};

/// Handle health check requests
pub async fn health_check(state: &AppState) -> Result<Value> {
    let cache = state.cache.stats().await;
    Ok(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": cache,
    }))
}

/// Registered sources and where their manifests live
pub fn service_info(state: &AppState) -> ServiceInfo {
    let sources = state
        .registry
        .keys()
        .into_iter()
        .filter_map(|key| state.registry.get(key))
        .map(|site| SourceInfo {
            key: site.key().to_string(),
            name: site.manifest().name,
            manifest: format!("/{}/manifest.json", site.key()),
        })
        .collect();

    ServiceInfo {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sources,
    }
}

/// Handle manifest requests
pub async fn manifest(state: &AppState, site: &dyn SourceSite) -> Result<Value> {
    let key = format!("{}:manifest", site.key());
    if let Some(body) = state.cache.get(&key).await {
        return Ok(body);
    }

    let body = serde_json::to_value(site.manifest())?;
    state.cache.insert(key, CacheKind::Manifest, body.clone()).await;
    Ok(body)
}

/// Handle catalog requests
pub async fn catalog(
    state: &AppState,
    site: &dyn SourceSite,
    content_type: &str,
    catalog_id: &str,
    skip: Option<u32>,
) -> Result<Value> {
    let Some(content_type) = parse_type(content_type) else {
        return Ok(serde_json::to_value(MetasResponse::default())?);
    };

    let key = format!("{}:catalog:{}:{}:{}", site.key(), content_type, catalog_id, skip.unwrap_or(0));
    if let Some(body) = state.cache.get(&key).await {
        return Ok(body);
    }

    let session = Session::new(state.client.clone());
    let response = sources::catalog(site, &session, content_type, catalog_id, skip).await;
    let body = serde_json::to_value(&response)?;
    if !response.metas.is_empty() {
        state.cache.insert(key, CacheKind::Catalog, body.clone()).await;
    }
    Ok(body)
}

/// Handle meta requests
pub async fn meta(state: &AppState, site: &dyn SourceSite, content_type: &str, id: &str) -> Result<Value> {
    let Some(content_type) = parse_type(content_type) else {
        return Ok(serde_json::to_value(MetaResponse::default())?);
    };

    let key = format!("{}:meta:{}:{}", site.key(), content_type, id);
    if let Some(body) = state.cache.get(&key).await {
        return Ok(body);
    }

    let session = Session::new(state.client.clone());
    let response = sources::meta(site, &session, content_type, id).await;
    let body = serde_json::to_value(&response)?;
    if response.meta.is_some() {
        state.cache.insert(key, CacheKind::Meta, body.clone()).await;
    }
    Ok(body)
}

/// Handle stream requests
pub async fn streams(state: &AppState, site: &dyn SourceSite, content_type: &str, video_id: &str) -> Result<Value> {
    let Some(content_type) = parse_type(content_type) else {
        return Ok(serde_json::to_value(StreamsResponse::default())?);
    };

    let key = format!("{}:stream:{}:{}", site.key(), content_type, video_id);
    if let Some(body) = state.cache.get(&key).await {
        return Ok(body);
    }

    let session = Session::new(state.client.clone());
    let response = sources::streams(site, &session, content_type, video_id).await;
    let body = serde_json::to_value(&response)?;
    if !response.streams.is_empty() {
        state.cache.insert(key, CacheKind::Stream, body.clone()).await;
    }
    Ok(body)
}

fn parse_type(content_type: &str) -> Option<ContentType> {
    match content_type.parse() {
        Ok(content_type) => Some(content_type),
        Err(e) => {
            debug!("Answering empty: {}", e);
            None
        }
    }
}

/// Drop the `.json` suffix of a resource path segment
pub fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// `skip` value of an extra-arguments segment such as `skip=40.json`
pub fn parse_skip(extra: &str) -> Option<u32> {
    strip_json(extra)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "skip")
        .and_then(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json() {
        assert_eq!(strip_json("uakino_movies_year.json"), "uakino_movies_year");
        assert_eq!(strip_json("seriesss/drama/1-x/1:2.json"), "seriesss/drama/1-x/1:2");
        assert_eq!(strip_json("plain"), "plain");
    }

    #[test]
    fn test_parse_skip() {
        assert_eq!(parse_skip("skip=40.json"), Some(40));
        assert_eq!(parse_skip("genre=Drama&skip=20.json"), Some(20));
        assert_eq!(parse_skip("skip=abc.json"), None);
        assert_eq!(parse_skip("genre=Drama.json"), None);
    }
}
