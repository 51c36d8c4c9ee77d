//! Source sites and their extraction pipelines
//!
//! Each supported site implements [`SourceSite`]: preview, meta, video and
//! stream extraction against that site's markup. Sites are listed
//! explicitly in [`SourceRegistry::new`].
//!
//! Site methods return [`crate::error::Result`] per stage. The free
//! functions [`catalog`], [`meta`] and [`streams`] are the public
//! operations: they log any failure and answer with the empty result, so
//! callers only ever see less data, never an error.

pub mod eneyida;
pub mod uakino;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{SourceConfig, SourcesConfig};
use crate::error::Result;
use crate::extract::{promote_scheme, script};
use crate::models::{
    CatalogDescriptor, ContentType, Manifest, MetaResponse, MetasResponse, Preview, Series, Stream,
    StreamsResponse, Video,
};
use crate::session::Session;

pub use eneyida::EneyidaSource;
pub use uakino::UakinoSource;

/// A catalog offered by a site and the listing path backing it
#[derive(Debug, Clone, Copy)]
pub struct CatalogDef {
    pub id: &'static str,
    pub content_type: ContentType,
    pub name: &'static str,
    pub path: &'static str,
}

impl CatalogDef {
    pub fn descriptor(&self) -> CatalogDescriptor {
        CatalogDescriptor {
            content_type: self.content_type,
            id: self.id.to_string(),
            name: self.name.to_string(),
            extra: Vec::new(),
        }
    }

    /// Listing URL for a 1-based page number
    pub fn page_url(&self, base_url: &str, page: u32) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if page > 1 {
            if !url.ends_with('/') {
                url.push('/');
            }
            url.push_str(&format!("page/{}/", page));
        }
        url
    }
}

/// Extraction pipeline of one scraped site
#[async_trait]
pub trait SourceSite: Send + Sync {
    /// Path segment the site is served under (`/{key}/manifest.json`)
    fn key(&self) -> &'static str;

    /// Static addon descriptor
    fn manifest(&self) -> Manifest;

    /// Catalogs this site offers
    fn catalogs(&self) -> &'static [CatalogDef];

    /// Site settings (base URL, listing page size)
    fn config(&self) -> &SourceConfig;

    /// Turn a listing page into previews
    fn parse_previews(&self, html: &str, content_type: ContentType) -> Vec<Preview>;

    /// Full record for one item, including its videos
    async fn fetch_meta(&self, session: &Session, content_type: ContentType, id: &str) -> Result<Series>;

    /// Ordered videos of one item, given its already fetched detail page
    async fn fetch_videos(
        &self,
        session: &Session,
        detail_html: &str,
        id: &str,
        content_type: ContentType,
    ) -> Result<Vec<Video>>;

    /// Playable streams for one video id
    async fn fetch_streams(&self, session: &Session, content_type: ContentType, video_id: &str) -> Result<Vec<Stream>>;

    /// Listing URL for a catalog id and optional `skip` offset
    fn catalog_url(&self, catalog_id: &str, skip: Option<u32>) -> Option<String> {
        let def = self.catalogs().iter().find(|c| c.id == catalog_id)?;
        let page = skip.map(|s| self.config().page_for_skip(s)).unwrap_or(1);
        Some(def.page_url(&self.config().base_url, page))
    }

    /// Fetch and parse one listing page
    async fn fetch_previews(
        &self,
        session: &Session,
        content_type: ContentType,
        catalog_id: &str,
        skip: Option<u32>,
    ) -> Result<Vec<Preview>> {
        let Some(url) = self.catalog_url(catalog_id, skip) else {
            debug!("Unknown catalog {} for {}", catalog_id, self.key());
            return Ok(Vec::new());
        };
        info!("📄 Fetching {} catalog page: {}", self.key(), url);
        let html = session.get_page(&url).await?;
        Ok(self.parse_previews(&html, content_type))
    }
}

/// Explicit table of supported sites
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SourceSite>>,
}

impl SourceRegistry {
    /// Register every supported site
    pub fn new(config: &SourcesConfig) -> Self {
        let sources: Vec<Arc<dyn SourceSite>> = vec![
            Arc::new(UakinoSource::new(config.uakino.clone())),
            Arc::new(EneyidaSource::new(config.eneyida.clone())),
        ];
        Self { sources }
    }

    /// Site registered under `key`
    pub fn get(&self, key: &str) -> Option<Arc<dyn SourceSite>> {
        self.sources.iter().find(|s| s.key() == key).cloned()
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.key()).collect()
    }
}

/// Catalog operation: previews of one listing page, empty on any failure
pub async fn catalog(
    site: &dyn SourceSite,
    session: &Session,
    content_type: ContentType,
    catalog_id: &str,
    skip: Option<u32>,
) -> MetasResponse {
    match site.fetch_previews(session, content_type, catalog_id, skip).await {
        Ok(metas) => {
            info!("✅ {} catalog {}: {} previews", site.key(), catalog_id, metas.len());
            MetasResponse { metas }
        }
        Err(e) => {
            warn!("Catalog {} of {} failed: {}", catalog_id, site.key(), e);
            MetasResponse::default()
        }
    }
}

/// Meta operation: the item's record, or an empty object on any failure
pub async fn meta(site: &dyn SourceSite, session: &Session, content_type: ContentType, id: &str) -> MetaResponse {
    match site.fetch_meta(session, content_type, id).await {
        Ok(series) => {
            info!("✅ {} meta {}: {} videos", site.key(), id, series.videos.len());
            MetaResponse { meta: Some(series) }
        }
        Err(e) => {
            warn!("Meta {} of {} failed: {}", id, site.key(), e);
            MetaResponse::default()
        }
    }
}

/// Stream operation: resolved streams, empty on any failure
pub async fn streams(
    site: &dyn SourceSite,
    session: &Session,
    content_type: ContentType,
    video_id: &str,
) -> StreamsResponse {
    match site.fetch_streams(session, content_type, video_id).await {
        Ok(streams) => {
            info!("🎬 {} stream {}: {} streams", site.key(), video_id, streams.len());
            StreamsResponse { streams }
        }
        Err(e) => {
            warn!("Streams {} of {} failed: {}", video_id, site.key(), e);
            StreamsResponse::default()
        }
    }
}

/// Video enumeration as used by meta: best effort, empty on any failure
pub async fn videos_or_empty(
    site: &dyn SourceSite,
    session: &Session,
    detail_html: &str,
    id: &str,
    content_type: ContentType,
) -> Vec<Video> {
    match site.fetch_videos(session, detail_html, id, content_type).await {
        Ok(videos) => videos,
        Err(e) => {
            warn!("No videos for {} on {}: {}", id, site.key(), e);
            Vec::new()
        }
    }
}

/// Build a manifest from a site's catalog table
pub(crate) fn build_manifest(
    id: &str,
    name: &str,
    description: &str,
    base_url: &str,
    catalogs: &[CatalogDef],
) -> Manifest {
    Manifest {
        id: id.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        logo: format!("{}/favicon.ico", base_url.trim_end_matches('/')),
        name: name.to_string(),
        description: description.to_string(),
        types: vec![ContentType::Movie, ContentType::Series],
        catalogs: catalogs.iter().map(CatalogDef::descriptor).collect(),
        resources: vec!["catalog".to_string(), "meta".to_string(), "stream".to_string()],
    }
}

/// Fetch a player page on behalf of the detail page.
///
/// `Ok(None)` when the player answers with anything but 200.
pub(crate) async fn fetch_player_page(session: &Session, player_url: &str, referer: &str) -> Result<Option<String>> {
    let player_url = promote_scheme(player_url);
    info!("▶️ Fetching player page: {}", player_url);
    let page = session.get_with_referer(&player_url, referer).await?;
    if !page.is_ok() {
        warn!("Player page {} answered with status {}", player_url, page.status);
        return Ok(None);
    }
    Ok(Some(page.body))
}

/// Resolve a player that exposes a single playable URL
pub(crate) async fn resolve_direct_stream(
    session: &Session,
    player_url: &str,
    referer: &str,
    name: String,
) -> Result<Vec<Stream>> {
    let Some(html) = fetch_player_page(session, player_url, referer).await? else {
        return Ok(Vec::new());
    };
    match script::find_file_url(&script::script_text(&html)) {
        Some(url) => {
            debug!("Final stream URL: {}", url);
            Ok(vec![Stream { name, url }])
        }
        None => {
            warn!("No file url in player page {}", player_url);
            Ok(Vec::new())
        }
    }
}
