/// In-memory response cache with per-resource TTLs
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::CacheConfig;

/// Addon resource a cached response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Manifest,
    Catalog,
    Meta,
    Stream,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    seq: u64,
    stored_at: Instant,
    ttl: Duration,
    body: Value,
}

impl CacheEntry {
    fn is_valid(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// Serialized responses keyed by request path
pub struct ResponseCache {
    config: CacheConfig,
    entries: RwLock<HashMap<String, CacheEntry>>,
    sequence: AtomicU64,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.max_entries > 0
    }

    fn ttl(&self, kind: CacheKind) -> Duration {
        let seconds = match kind {
            CacheKind::Manifest => self.config.manifest_ttl_seconds,
            CacheKind::Catalog => self.config.catalog_ttl_seconds,
            CacheKind::Meta => self.config.meta_ttl_seconds,
            CacheKind::Stream => self.config.stream_ttl_seconds,
        };
        Duration::from_secs(seconds)
    }

    /// Cached body for `key` if present and not expired
    pub async fn get(&self, key: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_valid() => {
                debug!("📚 Cache hit: {}", key);
                Some(entry.body.clone())
            }
            Some(_) => {
                debug!("⏰ Cache expired: {}", key);
                None
            }
            None => {
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    /// Store a response, evicting expired and then oldest entries when full
    pub async fn insert(&self, key: impl Into<String>, kind: CacheKind, body: Value) {
        if !self.is_enabled() {
            return;
        }

        let key = key.into();
        let mut entries = self.entries.write().await;
        if entries.len() >= self.config.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, entry| entry.is_valid());
            while entries.len() >= self.config.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.seq)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(oldest) => {
                        entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        debug!("💾 Cached {:?} response: {}", kind, key);
        entries.insert(
            key,
            CacheEntry {
                seq: self.sequence.fetch_add(1, Ordering::Relaxed),
                stored_at: Instant::now(),
                ttl: self.ttl(kind),
                body,
            },
        );
    }

    /// Remove expired entries
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid());
        let cleaned = before - entries.len();
        if cleaned > 0 {
            info!("🧹 Cleaned up {} expired cache entries", cleaned);
        }
        cleaned
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let valid_entries = entries.values().filter(|e| e.is_valid()).count();
        CacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
        }
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}
