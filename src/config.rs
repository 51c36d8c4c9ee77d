use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the addon server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Outbound client settings used for every site request
    pub http: HttpConfig,

    /// Response cache settings
    pub cache: CacheConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Per-site settings
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent presented to the sites
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache responses in memory
    pub enabled: bool,

    /// Maximum number of cached responses
    pub max_entries: usize,

    /// Manifest TTL in seconds
    pub manifest_ttl_seconds: u64,

    /// Catalog TTL in seconds
    pub catalog_ttl_seconds: u64,

    /// Meta TTL in seconds
    pub meta_ttl_seconds: u64,

    /// Stream TTL in seconds
    pub stream_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridden by RUST_LOG
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub uakino: SourceConfig,
    pub eneyida: SourceConfig,
}

/// Settings of one scraped site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name used in the manifest
    pub name: String,

    /// Site root, without trailing slash
    pub base_url: String,

    /// Listing page size, used to turn `skip` into a page number
    pub items_per_page: u32,
}

impl SourceConfig {
    /// 1-based listing page holding the item at offset `skip`
    pub fn page_for_skip(&self, skip: u32) -> u32 {
        skip / self.items_per_page.max(1) + 1
    }
}

impl Config {
    /// Load configuration from the first config file found, falling back
    /// to defaults with environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = [
            "stremio-ua.toml",
            "config/stremio-ua.toml",
            "/etc/stremio-ua/config.toml",
        ];

        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to load config file {}: {}", path, e),
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
        let mut config: Config = toml::from_str(&config_str)?;
        for source in [&mut config.sources.uakino, &mut config.sources.eneyida] {
            source.base_url = source.base_url.trim_end_matches('/').to_string();
        }
        config.apply_env();
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("STREMIO_UA_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("STREMIO_UA_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid STREMIO_UA_PORT: {}", port),
            }
        }

        if let Ok(level) = std::env::var("STREMIO_UA_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(url) = std::env::var("STREMIO_UA_UAKINO_URL") {
            self.sources.uakino.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(url) = std::env::var("STREMIO_UA_ENEYIDA_URL") {
            self.sources.eneyida.base_url = url.trim_end_matches('/').to_string();
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(anyhow!("http.timeout_seconds must be greater than 0"));
        }

        for (key, source) in [("uakino", &self.sources.uakino), ("eneyida", &self.sources.eneyida)] {
            if source.base_url.trim().is_empty() {
                return Err(anyhow!("sources.{}.base_url must not be empty", key));
            }
            if url::Url::parse(&source.base_url).is_err() {
                return Err(anyhow!("sources.{}.base_url is not a valid URL: {}", key, source.base_url));
            }
            if source.items_per_page == 0 {
                return Err(anyhow!("sources.{}.items_per_page must be greater than 0", key));
            }
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(anyhow!("cache.max_entries must be greater than 0 when caching is enabled"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Stremio UA Configuration:\n\
            - Listen: {}:{}\n\
            - HTTP timeout: {}s\n\
            - Cache: {} (max {} entries)\n\
            - uakino: {}\n\
            - eneyida: {}",
            self.server.host,
            self.server.port,
            self.http.timeout_seconds,
            if self.cache.enabled { "enabled" } else { "disabled" },
            self.cache.max_entries,
            self.sources.uakino.base_url,
            self.sources.eneyida.base_url,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            http: HttpConfig {
                timeout_seconds: 30,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36 Edg/136.0.0.0".to_string(),
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 2048,
                manifest_ttl_seconds: 24 * 60 * 60,
                catalog_ttl_seconds: 24 * 60 * 60,
                meta_ttl_seconds: 24 * 60 * 60,
                stream_ttl_seconds: 6 * 60 * 60,
            },
            logging: LoggingConfig {
                level: "stremio_ua=info,tower_http=info,warn".to_string(),
            },
            sources: SourcesConfig {
                uakino: SourceConfig {
                    name: "UAKino".to_string(),
                    base_url: "https://uakino.me".to_string(),
                    items_per_page: 20,
                },
                eneyida: SourceConfig {
                    name: "Eneyida".to_string(),
                    base_url: "https://eneyida.tv".to_string(),
                    items_per_page: 20,
                },
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.http.timeout_seconds = seconds;
        self
    }

    pub fn with_uakino_url(mut self, url: impl Into<String>) -> Self {
        self.config.sources.uakino.base_url = url.into();
        self
    }

    pub fn with_eneyida_url(mut self, url: impl Into<String>) -> Self {
        self.config.sources.eneyida.base_url = url.into();
        self
    }

    pub fn with_items_per_page(mut self, items: u32) -> Self {
        self.config.sources.uakino.items_per_page = items;
        self.config.sources.eneyida.items_per_page = items;
        self
    }

    pub fn enable_cache(mut self, enable: bool) -> Self {
        self.config.cache.enabled = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
