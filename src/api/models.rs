//! API data models outside the addon protocol

use serde::{Deserialize, Serialize};

/// Error body for requests the addon cannot route
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn unknown_source(source: &str) -> Self {
        Self {
            error: format!("Unknown source: {}", source),
        }
    }
}

/// One registered site as listed at `/`
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceInfo {
    pub key: String,
    pub name: String,
    pub manifest: String,
}

/// Service overview served at `/`
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub sources: Vec<SourceInfo>,
}
