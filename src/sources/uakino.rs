//! uakino.me pipeline
//!
//! Listing pages carry `div.movie-item.short-item` cards. Detail pages
//! describe the item through `fi-label`/`fi-desc` pairs. Series episodes
//! come from an AJAX endpoint answering `{"success": true, "response": "<html>"}`.
//! Episode items carry the player URL in `data-file` and the dub name in
//! `data-voice`.

use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::{build_manifest, resolve_direct_stream, videos_or_empty, CatalogDef, SourceSite};
use crate::config::SourceConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::urls::item_id_from_href;
use crate::extract::{
    absolutize, comma_list, detail_url, first_number, season_in_title, DocumentQuery,
    FieldRole,
};
use crate::models::{sort_videos, ContentType, Manifest, Preview, Series, Stream, Video};
use crate::session::Session;

const MANIFEST_ID: &str = "ua.stremio.uakino";
const DESCRIPTION: &str = "Фільми, серіали, мультфільми та аніме з сайту uakino.me українською.";
const TITLE_PLACEHOLDER: &str = "Назва не знайдена";
const MOVIE_TITLE: &str = "Фільм";
const DEFAULT_QUALITY: &str = "HD";
const DEFAULT_VOICE: &str = "Default";

static CATALOGS: &[CatalogDef] = &[
    CatalogDef {
        id: "uakino_movies_year",
        content_type: ContentType::Movie,
        name: "Фільми (за роком)",
        path: "/filmy/f/c.year=1980,2025/sort=d.year;desc/",
    },
    CatalogDef {
        id: "uakino_series_year",
        content_type: ContentType::Series,
        name: "Серіали (за роком)",
        path: "/seriesss/f/c.year=1980,2025/sort=d.year;desc/",
    },
    CatalogDef {
        id: "uakino_cartoons_year",
        content_type: ContentType::Movie,
        name: "Мультфільми (за роком)",
        path: "/cartoon/f/c.year=1980,2025/sort=d.year;desc/",
    },
    CatalogDef {
        id: "uakino_anime_year",
        content_type: ContentType::Series,
        name: "Аніме (за роком)",
        path: "/animeukr/f/c.year=1980,2025/sort=d.year;desc/",
    },
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid uakino selector")
}

fn role(label_css: &str, value_css: &str, label_text: &str) -> FieldRole {
    FieldRole::new(label_css, value_css, label_text).expect("Invalid uakino field role")
}

// Listing cards
static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.movie-item.short-item"));
static ITEM_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a.movie-title"));
static ITEM_POSTER: LazyLock<Selector> = LazyLock::new(|| selector("div.movie-img img"));
static ITEM_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("div.movie-text span.desc-about-text"));
static ITEM_GENRE: LazyLock<FieldRole> = LazyLock::new(|| role("div.fi-label", "div.deck-value", "Жанр"));

// Detail page
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1 span.solototle[itemprop=name]"));
static POSTER: LazyLock<Selector> = LazyLock::new(|| selector("div.film-poster img[itemprop=image]"));
static SERIAL_POSTER: LazyLock<Selector> =
    LazyLock::new(|| selector("div.film-poster-serial img[itemprop=image]"));
static DESCRIPTION_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div[itemprop=description]"));
static RELEASED: LazyLock<Selector> = LazyLock::new(|| selector("meta[itemprop=dateCreated]"));
static PLAYLIST_HOLDER: LazyLock<Selector> =
    LazyLock::new(|| selector("div#pre.playlists-ajax[data-news_id]"));
static MOVIE_PLAYER: LazyLock<Selector> = LazyLock::new(|| selector(".box.full-text.visible iframe#pre"));
static GENRE: LazyLock<FieldRole> = LazyLock::new(|| role("div.fi-label", "div.fi-desc", "Жанр"));
static DIRECTOR: LazyLock<FieldRole> = LazyLock::new(|| role("div.fi-label", "div.fi-desc", "Режисер"));
static RUNTIME: LazyLock<FieldRole> = LazyLock::new(|| role("div.fi-label", "div.fi-desc", "Тривалість"));
static QUALITY: LazyLock<FieldRole> = LazyLock::new(|| role("div.fi-label", "div.fi-desc", "Якість"));

// Playlist fragment, strictest first
static EPISODE_ITEMS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["div.playlists-videos div.playlists-items ul li", "ul li"]
        .iter()
        .map(|css| selector(css))
        .collect()
});

/// Everything the pipeline reads from one detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPage {
    pub title: Option<String>,
    pub poster: Option<String>,
    pub description: String,
    pub genres: Vec<String>,
    pub director: Vec<String>,
    pub runtime: Option<String>,
    pub released: Option<String>,
    pub news_id: Option<String>,
    pub serial_thumbnail: Option<String>,
    pub movie_player: Option<String>,
    pub quality: Option<String>,
}

impl DetailPage {
    pub fn parse(base_url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();

        Self {
            title: root.text_at(&TITLE),
            poster: root.attr_at(&POSTER, "src").and_then(|src| absolutize(base_url, src)),
            description: root.text_at(&DESCRIPTION_BLOCK).unwrap_or_default(),
            genres: root.role_list(&GENRE),
            director: root.role_list(&DIRECTOR),
            runtime: root.role_text(&RUNTIME),
            released: root
                .attr_at(&RELEASED, "content")
                .map(str::to_string)
                .filter(|d| !d.is_empty()),
            news_id: root
                .attr_at(&PLAYLIST_HOLDER, "data-news_id")
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            serial_thumbnail: root
                .attr_at(&SERIAL_POSTER, "src")
                .and_then(|src| absolutize(base_url, src)),
            movie_player: root
                .attr_at(&MOVIE_PLAYER, "src")
                .map(|src| src.trim().to_string())
                .filter(|src| !src.is_empty()),
            quality: root.role_text(&QUALITY),
        }
    }

    /// Season this page describes, from a "N сезон" title
    pub fn season(&self) -> u32 {
        let title = self.title.as_deref().unwrap_or_default();
        match season_in_title(title) {
            Some(season) => season,
            None => {
                debug!("No season in title '{}', assuming 1", title);
                1
            }
        }
    }

    /// The single video of a movie page
    pub fn movie_video(&self, item_id: &str) -> Video {
        Video {
            id: item_id.to_string(),
            title: self.title.clone().unwrap_or_else(|| MOVIE_TITLE.to_string()),
            thumbnail: self.poster.clone(),
            released: self.released.clone(),
            season: None,
            episode: None,
        }
    }

    pub fn into_series(self, item_id: &str, content_type: ContentType, videos: Vec<Video>) -> Series {
        Series {
            id: item_id.to_string(),
            content_type,
            name: self.title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
            genres: self.genres,
            background: self.poster.clone(),
            poster: self.poster,
            description: self.description,
            director: self.director,
            runtime: self.runtime,
            videos,
        }
    }
}

/// One `li` of the AJAX playlist fragment
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub title: String,
    pub episode: Option<u32>,
    pub file: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<String>,
}

/// Inner HTML of a playlist envelope, or an error when it reports failure
pub fn parse_playlist_envelope(raw: &str) -> Result<String> {
    let envelope: PlaylistEnvelope = serde_json::from_str(raw)?;
    match envelope.response {
        Some(html) if envelope.success => Ok(html),
        _ => Err(ScrapeError::Payload(format!(
            "playlist envelope without success/response: {}",
            raw.chars().take(200).collect::<String>()
        ))),
    }
}

/// AJAX endpoint serving series playlists
pub fn playlist_url(base_url: &str) -> String {
    format!("{}/engine/ajax/playlists.php", base_url.trim_end_matches('/'))
}

/// Episode items of a playlist fragment
pub fn parse_playlist_entries(fragment: &str) -> Vec<PlaylistEntry> {
    let document = Html::parse_fragment(fragment);
    let root = document.root_element();

    for items in EPISODE_ITEMS.iter() {
        let entries: Vec<PlaylistEntry> = root
            .select(items)
            .map(|li| {
                let title = li.text_of();
                PlaylistEntry {
                    episode: first_number(&title),
                    title,
                    file: li.attr_of("data-file").map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
                    voice: li.attr_of("data-voice").map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
                }
            })
            .collect();
        if !entries.is_empty() {
            return entries;
        }
    }

    debug!("No episode items in playlist fragment");
    Vec::new()
}

/// Ordered episode videos of one season.
///
/// Items without an episode number are skipped. Repeated titles (the same
/// episode under several dubs) and repeated ids keep their first occurrence.
pub fn series_videos(item_id: &str, season: u32, entries: &[PlaylistEntry], thumbnail: Option<&str>) -> Vec<Video> {
    let mut seen_titles = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut videos = Vec::new();

    for entry in entries {
        let Some(episode) = entry.episode else {
            debug!("No episode number in '{}'", entry.title);
            continue;
        };
        let id = format!("{}/{}:{}", item_id, season, episode);
        if !seen_titles.insert(entry.title.clone()) || !seen_ids.insert(id.clone()) {
            continue;
        }
        videos.push(Video {
            id,
            title: entry.title.clone(),
            thumbnail: thumbnail.map(str::to_string),
            released: None,
            season: Some(season),
            episode: Some(episode),
        });
    }

    sort_videos(&mut videos);
    videos
}

/// Split a video id into item id and optional `(season, episode)`.
///
/// `seriesss/drama/123-name/1:5` → `("seriesss/drama/123-name", Some((1, 5)))`
pub fn split_video_id(video_id: &str) -> (String, Option<(u32, u32)>) {
    if let Some((item_id, last)) = video_id.rsplit_once('/') {
        if let Some((season, episode)) = last.split_once(':') {
            if let (Ok(season), Ok(episode)) = (season.trim().parse(), episode.trim().parse()) {
                return (item_id.to_string(), Some((season, episode)));
            }
        }
    }
    (video_id.to_string(), None)
}

/// First playlist entry for `episode` that carries a player URL
pub fn select_episode_player(entries: &[PlaylistEntry], episode: u32) -> Option<(String, String)> {
    entries
        .iter()
        .filter(|entry| entry.episode == Some(episode))
        .find_map(|entry| {
            let file = entry.file.clone()?;
            let voice = entry.voice.clone().unwrap_or_else(|| DEFAULT_VOICE.to_string());
            Some((file, format!("{} - Серія {}", voice, episode)))
        })
}

/// Previews of a listing page
pub fn parse_previews(base_url: &str, html: &str, content_type: ContentType) -> Vec<Preview> {
    let document = Html::parse_document(html);
    let mut previews = Vec::new();

    for item in document.select(&ITEM) {
        let Some(link) = item.first(&ITEM_TITLE) else {
            debug!("Listing card without title link");
            continue;
        };
        let Some(href) = link.attr_of("href") else {
            debug!("Title link without href: {}", link.text_of());
            continue;
        };
        let id = item_id_from_href(base_url, href);
        if id.is_empty() {
            continue;
        }

        previews.push(Preview {
            id,
            content_type,
            name: link.text_of(),
            poster: item.attr_at(&ITEM_POSTER, "src").and_then(|src| absolutize(base_url, src)),
            description: item.text_at(&ITEM_DESCRIPTION).unwrap_or_default(),
            genres: item.role_value(&ITEM_GENRE).map(comma_list).unwrap_or_default(),
        });
    }

    previews
}

/// uakino.me source
pub struct UakinoSource {
    config: SourceConfig,
}

impl UakinoSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    fn detail_url(&self, item_id: &str) -> String {
        detail_url(&self.config.base_url, item_id)
    }

    async fn fetch_detail(&self, session: &Session, item_id: &str) -> Result<DetailPage> {
        let url = self.detail_url(item_id);
        info!("📄 Fetching uakino detail page: {}", url);
        let html = session.get_page(&url).await?;
        Ok(DetailPage::parse(&self.config.base_url, &html))
    }

    /// Episode items of the playlist behind `news_id`
    async fn fetch_playlist(&self, session: &Session, item_id: &str, news_id: &str) -> Result<Vec<PlaylistEntry>> {
        let url = playlist_url(&self.config.base_url);
        let query = [
            ("news_id", news_id.to_string()),
            ("xfield", "playlist".to_string()),
            ("time", Utc::now().timestamp().to_string()),
        ];
        info!("📋 Fetching uakino playlist for news_id={}", news_id);
        let raw = session.get_ajax(&url, &query, &self.detail_url(item_id)).await?;
        let fragment = parse_playlist_envelope(&raw)?;
        let entries = parse_playlist_entries(&fragment);
        if entries.is_empty() {
            warn!("Playlist for news_id={} has no episode items", news_id);
        }
        Ok(entries)
    }

    async fn movie_streams(&self, session: &Session, item_id: &str) -> Result<Vec<Stream>> {
        let detail = self.fetch_detail(session, item_id).await?;
        let Some(player_url) = detail.movie_player else {
            warn!("No player iframe for movie {}", item_id);
            return Ok(Vec::new());
        };
        let quality = detail.quality.unwrap_or_else(|| DEFAULT_QUALITY.to_string());
        let name = format!("{} ({})", MOVIE_TITLE, quality);
        resolve_direct_stream(session, &player_url, &self.detail_url(item_id), name).await
    }

    async fn episode_streams(&self, session: &Session, item_id: &str, season: u32, episode: u32) -> Result<Vec<Stream>> {
        let detail = self.fetch_detail(session, item_id).await?;
        let news_id = detail
            .news_id
            .clone()
            .ok_or_else(|| ScrapeError::missing("playlist news_id"))?;

        let page_season = detail.season();
        if page_season != season {
            warn!("Requested season {} but {} shows season {}", season, item_id, page_season);
            return Ok(Vec::new());
        }

        let entries = self.fetch_playlist(session, item_id, &news_id).await?;
        let Some((player_url, name)) = select_episode_player(&entries, episode) else {
            warn!("Episode {} not found in playlist of {}", episode, item_id);
            return Ok(Vec::new());
        };
        resolve_direct_stream(session, &player_url, &self.detail_url(item_id), name).await
    }
}

#[async_trait]
impl SourceSite for UakinoSource {
    fn key(&self) -> &'static str {
        "uakino"
    }

    fn manifest(&self) -> Manifest {
        build_manifest(MANIFEST_ID, &self.config.name, DESCRIPTION, &self.config.base_url, CATALOGS)
    }

    fn catalogs(&self) -> &'static [CatalogDef] {
        CATALOGS
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn parse_previews(&self, html: &str, content_type: ContentType) -> Vec<Preview> {
        parse_previews(&self.config.base_url, html, content_type)
    }

    async fn fetch_meta(&self, session: &Session, content_type: ContentType, id: &str) -> Result<Series> {
        let url = self.detail_url(id);
        info!("📄 Fetching uakino detail page: {}", url);
        let html = session.get_page(&url).await?;
        let videos = videos_or_empty(self, session, &html, id, content_type).await;
        Ok(DetailPage::parse(&self.config.base_url, &html).into_series(id, content_type, videos))
    }

    async fn fetch_videos(
        &self,
        session: &Session,
        detail_html: &str,
        id: &str,
        content_type: ContentType,
    ) -> Result<Vec<Video>> {
        let detail = DetailPage::parse(&self.config.base_url, detail_html);
        if content_type == ContentType::Movie {
            return Ok(vec![detail.movie_video(id)]);
        }

        let Some(news_id) = detail.news_id.clone() else {
            warn!("No playlist news_id on series page {}", id);
            return Ok(Vec::new());
        };
        let season = detail.season();
        let entries = self.fetch_playlist(session, id, &news_id).await?;
        let videos = series_videos(id, season, &entries, detail.serial_thumbnail.as_deref());
        info!("📺 Found {} episodes for season {} of {}", videos.len(), season, id);
        Ok(videos)
    }

    async fn fetch_streams(&self, session: &Session, content_type: ContentType, video_id: &str) -> Result<Vec<Stream>> {
        let (item_id, episode) = split_video_id(video_id);
        match (content_type, episode) {
            (ContentType::Movie, _) => self.movie_streams(session, video_id).await,
            (ContentType::Series, Some((season, episode))) => {
                self.episode_streams(session, &item_id, season, episode).await
            }
            (ContentType::Series, None) => Err(ScrapeError::InvalidId(video_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://uakino.me";

    const LISTING: &str = r#"<html><body><div class="movies-list">
        <div class="movie-item short-item">
            <div class="movie-img"><img src="/uploads/posts/p1.jpg"></div>
            <a class="movie-title" href="https://uakino.me/filmy/genre_comedy/123-name.html"> Назва </a>
            <div class="movie-text">
                <span class="desc-about-text"> Опис фільму </span>
                <div class="deck-info"><div class="fi-label">Жанр:</div><div class="deck-value">Комедія, Драма</div></div>
            </div>
        </div>
        <div class="movie-item short-item"><div class="movie-img"><img src="/x.jpg"></div></div>
        <div class="movie-item short-item">
            <a class="movie-title" href="/seriesss/drama/456-other.html">Інша</a>
        </div>
    </div></body></html>"#;

    const SERIES_DETAIL: &str = r#"<html><body>
        <h1><span class="solototle" itemprop="name">Серіал 2 сезон</span></h1>
        <div class="film-poster"><img itemprop="image" src="/uploads/poster.jpg"></div>
        <div class="film-poster-serial"><img itemprop="image" src="/uploads/serial.jpg"></div>
        <div class="fi-item"><div class="fi-label">Жанр:</div><div class="fi-desc"><a>Драма</a><a>Трилер</a></div></div>
        <div class="fi-item"><div class="fi-label">Режисер:</div><div class="fi-desc">Іван Петренко</div></div>
        <div class="fi-item"><div class="fi-label">Тривалість:</div><div class="fi-desc">45 хв</div></div>
        <div itemprop="description"> Опис серіалу </div>
        <div id="pre" class="playlists-ajax" data-news_id="777"></div>
    </body></html>"#;

    const MOVIE_DETAIL: &str = r#"<html><head><meta itemprop="dateCreated" content="2023-05-01"></head><body>
        <h1><span class="solototle" itemprop="name">Фільм року</span></h1>
        <div class="film-poster"><img itemprop="image" src="//cdn.uakino.me/poster.jpg"></div>
        <div class="fi-item"><div class="fi-label">Якість:</div><div class="fi-desc">FullHD</div></div>
        <div class="box full-text visible"><iframe id="pre" src="//ashdi.vip/vod/1"></iframe></div>
    </body></html>"#;

    #[test]
    fn test_parse_previews() {
        let previews = parse_previews(BASE, LISTING, ContentType::Movie);
        assert_eq!(previews.len(), 2);

        let first = &previews[0];
        assert_eq!(first.id, "filmy/genre_comedy/123-name");
        assert_eq!(first.name, "Назва");
        assert_eq!(first.poster.as_deref(), Some("https://uakino.me/uploads/posts/p1.jpg"));
        assert_eq!(first.description, "Опис фільму");
        assert_eq!(first.genres, vec!["Комедія", "Драма"]);

        let second = &previews[1];
        assert_eq!(second.id, "seriesss/drama/456-other");
        assert!(second.poster.is_none());
        assert!(second.genres.is_empty());
    }

    #[test]
    fn test_detail_page_fields() {
        let detail = DetailPage::parse(BASE, SERIES_DETAIL);
        assert_eq!(detail.title.as_deref(), Some("Серіал 2 сезон"));
        assert_eq!(detail.season(), 2);
        assert_eq!(detail.news_id.as_deref(), Some("777"));
        assert_eq!(detail.serial_thumbnail.as_deref(), Some("https://uakino.me/uploads/serial.jpg"));

        let series = detail.into_series("seriesss/drama/456-other", ContentType::Series, Vec::new());
        assert_eq!(series.genres, vec!["Драма", "Трилер"]);
        assert_eq!(series.director, vec!["Іван Петренко"]);
        assert_eq!(series.runtime.as_deref(), Some("45 хв"));
        assert_eq!(series.description, "Опис серіалу");
        assert_eq!(series.background, series.poster);
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let detail = DetailPage::parse(BASE, "<html><body></body></html>");
        assert_eq!(detail.season(), 1);
        let series = detail.into_series("x", ContentType::Movie, Vec::new());
        assert_eq!(series.name, TITLE_PLACEHOLDER);
        assert!(series.poster.is_none());
    }

    #[test]
    fn test_movie_video_and_player() {
        let detail = DetailPage::parse(BASE, MOVIE_DETAIL);
        let video = detail.movie_video("filmy/1-x");
        assert_eq!(video.id, "filmy/1-x");
        assert_eq!(video.title, "Фільм року");
        assert_eq!(video.released.as_deref(), Some("2023-05-01"));
        assert_eq!(video.thumbnail.as_deref(), Some("https://cdn.uakino.me/poster.jpg"));
        assert_eq!(detail.movie_player.as_deref(), Some("//ashdi.vip/vod/1"));
        assert_eq!(detail.quality.as_deref(), Some("FullHD"));
    }

    #[test]
    fn test_playlist_envelope() {
        let html = parse_playlist_envelope(r#"{"success":true,"response":"<ul><li>1 серія</li></ul>"}"#).unwrap();
        assert_eq!(html, "<ul><li>1 серія</li></ul>");

        assert!(matches!(
            parse_playlist_envelope(r#"{"success":false}"#),
            Err(ScrapeError::Payload(_))
        ));
        assert!(matches!(parse_playlist_envelope("<html>"), Err(ScrapeError::Json(_))));
    }

    #[test]
    fn test_series_videos_dedupe_and_order() {
        let fragment = r#"<div class="playlists-videos"><div class="playlists-items"><ul>
            <li data-file="//p/2" data-voice="A">2 серія</li>
            <li data-file="//p/1" data-voice="A">1 серія</li>
            <li data-file="//p/1b" data-voice="B">1 серія</li>
            <li>Трейлер</li>
        </ul></div></div>"#;
        let entries = parse_playlist_entries(fragment);
        assert_eq!(entries.len(), 4);

        let videos = series_videos("s/1-x", 1, &entries, Some("https://uakino.me/t.jpg"));
        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["s/1-x/1:1", "s/1-x/1:2"]);
        assert!(videos.iter().all(|v| v.season == Some(1)));
        assert_eq!(videos[0].thumbnail.as_deref(), Some("https://uakino.me/t.jpg"));
    }

    #[test]
    fn test_playlist_url_ignores_trailing_slash() {
        assert_eq!(playlist_url("https://uakino.me/"), "https://uakino.me/engine/ajax/playlists.php");
        assert_eq!(playlist_url("https://uakino.me"), "https://uakino.me/engine/ajax/playlists.php");
    }

    #[test]
    fn test_empty_poster_src_is_absent() {
        let detail = DetailPage::parse(
            BASE,
            r#"<div class="film-poster"><img itemprop="image" src=""></div>"#,
        );
        assert_eq!(detail.poster, None);
    }

    #[test]
    fn test_first_season_from_bare_list_envelope() {
        let raw = r#"{"success":true,"response":"<ul><li>Серія 1</li><li>Серія 2</li></ul>"}"#;
        let detail = DetailPage::parse(
            BASE,
            r#"<h1><span class="solototle" itemprop="name">Шоу 1 сезон</span></h1>"#,
        );
        let entries = parse_playlist_entries(&parse_playlist_envelope(raw).unwrap());
        let videos = series_videos("seriesss/drama/1-show", detail.season(), &entries, None);

        let keys: Vec<(Option<u32>, Option<u32>)> = videos.iter().map(|v| (v.season, v.episode)).collect();
        assert_eq!(keys, vec![(Some(1), Some(1)), (Some(1), Some(2))]);
        assert_eq!(videos[0].id, "seriesss/drama/1-show/1:1");
        assert_eq!(videos[1].title, "Серія 2");
    }

    #[test]
    fn test_plain_list_fallback() {
        let entries = parse_playlist_entries("<ul><li>1 серія</li><li>2 серія</li></ul>");
        let videos = series_videos("s/1-x", 1, &entries, None);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].episode, Some(2));
    }

    #[test]
    fn test_split_video_id() {
        assert_eq!(
            split_video_id("seriesss/drama/123-name/1:5"),
            ("seriesss/drama/123-name".to_string(), Some((1, 5)))
        );
        assert_eq!(split_video_id("filmy/123-name"), ("filmy/123-name".to_string(), None));
        assert_eq!(split_video_id("filmy/123-name/x:y"), ("filmy/123-name/x:y".to_string(), None));
    }

    #[test]
    fn test_select_episode_player() {
        let entries = parse_playlist_entries(
            r#"<ul><li data-voice="Дубляж">1 серія</li><li data-file="//p/1">1 серія</li><li data-file="//p/2" data-voice="Дубляж">2 серія</li></ul>"#,
        );
        assert_eq!(
            select_episode_player(&entries, 1),
            Some(("//p/1".to_string(), "Default - Серія 1".to_string()))
        );
        assert_eq!(
            select_episode_player(&entries, 2),
            Some(("//p/2".to_string(), "Дубляж - Серія 2".to_string()))
        );
        assert_eq!(select_episode_player(&entries, 3), None);
    }
}
