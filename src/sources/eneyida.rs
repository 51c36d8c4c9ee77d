//! eneyida.tv pipeline
//!
//! Detail pages embed one player iframe. A `/vid/` player serves a movie
//! through a plain `file: "..."` URL. Any other player carries a
//! dub → season → episode playlist in `file: '[...]'`.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::{build_manifest, fetch_player_page, videos_or_empty, CatalogDef, SourceSite};
use crate::config::SourceConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::script::{self, PlayerSource};
use crate::extract::urls::{css_background_url, item_id_from_last_segment};
use crate::extract::{
    absolutize, detail_url, first_number, value_list, DocumentQuery, FieldRole, PlaylistEpisode,
};
use crate::models::{sort_videos, ContentType, Manifest, Preview, Series, Stream, Video};
use crate::session::Session;

const MANIFEST_ID: &str = "ua.stremio.eneyida";
const DESCRIPTION: &str = "Фільми, серіали, мультфільми та аніме з сайту eneyida.tv українською.";
const TITLE_PLACEHOLDER: &str = "Назва не знайдена";
const MOVIE_STREAM: &str = "Фільм";
const MOVIE_PLAYER_MARKER: &str = "/vid/";

static CATALOGS: &[CatalogDef] = &[
    CatalogDef {
        id: "eneyida_movies",
        content_type: ContentType::Movie,
        name: "Фільми",
        path: "/films/",
    },
    CatalogDef {
        id: "eneyida_series",
        content_type: ContentType::Series,
        name: "Серіали",
        path: "/series/",
    },
    CatalogDef {
        id: "eneyida_cartoons",
        content_type: ContentType::Movie,
        name: "Мультфільми",
        path: "/cartoon/",
    },
    CatalogDef {
        id: "eneyida_anime",
        content_type: ContentType::Series,
        name: "Аніме",
        path: "/anime/",
    },
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid eneyida selector")
}

fn info_row(label_text: &str) -> FieldRole {
    FieldRole::inline("ul.full_info li", label_text).expect("Invalid eneyida field role")
}

static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("article.short"));
static ITEM_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a.short_title"));
static ITEM_POSTER: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static ITEM_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector("div.short_subtitle"));

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.full_header-title h1"));
static POSTER: LazyLock<Selector> = LazyLock::new(|| selector("div.full_content-poster img"));
static DESCRIPTION_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("article.full_content-desc"));
static INFO_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("ul.full_info li"));
static GENRE: LazyLock<FieldRole> = LazyLock::new(|| info_row("Жанр"));
static DIRECTOR: LazyLock<FieldRole> = LazyLock::new(|| info_row("Режисер"));
static RUNTIME: LazyLock<FieldRole> = LazyLock::new(|| info_row("Тривалість"));
static BACKGROUND: LazyLock<Selector> = LazyLock::new(|| selector(".full_header__bg-img"));
static PLAYER: LazyLock<Selector> = LazyLock::new(|| selector(".tabs_b.visible iframe"));

/// Everything the pipeline reads from one detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPage {
    pub title: Option<String>,
    pub poster: Option<String>,
    pub background: Option<String>,
    pub description: String,
    pub genres: Vec<String>,
    pub director: Vec<String>,
    pub runtime: Option<String>,
    pub player: Option<String>,
}

impl DetailPage {
    pub fn parse(base_url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();

        // Genres sit in the second info row when rows carry no label
        let mut genres = root.role_list(&GENRE);
        if genres.is_empty() {
            genres = root.select(&INFO_ROWS).nth(1).map(value_list).unwrap_or_default();
        }

        Self {
            title: root.text_at(&TITLE),
            poster: root.attr_at(&POSTER, "src").and_then(|src| absolutize(base_url, src)),
            background: root
                .attr_at(&BACKGROUND, "style")
                .and_then(css_background_url)
                .and_then(|src| absolutize(base_url, &src)),
            description: root.text_at(&DESCRIPTION_BLOCK).unwrap_or_default(),
            genres,
            director: root.role_list(&DIRECTOR),
            runtime: root.role_text(&RUNTIME),
            player: root
                .attr_at(&PLAYER, "src")
                .map(|src| src.trim().to_string())
                .filter(|src| !src.is_empty()),
        }
    }

    /// Whether the embedded player serves a single movie file
    pub fn is_movie_player(&self) -> bool {
        self.player.as_deref().is_some_and(|src| src.contains(MOVIE_PLAYER_MARKER))
    }

    pub fn into_series(self, item_id: &str, content_type: ContentType, videos: Vec<Video>) -> Series {
        Series {
            id: item_id.to_string(),
            content_type,
            name: self.title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
            genres: self.genres,
            background: self.background.or_else(|| self.poster.clone()),
            poster: self.poster,
            description: self.description,
            director: self.director,
            runtime: self.runtime,
            videos,
        }
    }
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
            continue;
        };
        let id = item_id_from_last_segment(href);
        if id.is_empty() {
            continue;
        }

        let poster = item
            .first(&ITEM_POSTER)
            .and_then(|img| {
                [img.attr_of("data-src"), img.attr_of("src")]
                    .into_iter()
                    .flatten()
                    .find_map(|src| absolutize(base_url, src))
            });

        previews.push(Preview {
            id,
            content_type,
            name: link.text_of(),
            poster,
            description: item.text_at(&ITEM_DESCRIPTION).unwrap_or_default(),
            genres: Vec::new(),
        });
    }

    previews
}

/// Ordered episode videos of a structured playlist.
///
/// The same season/episode pair offered by several dubs is listed once.
/// Seasons without a number count as season 1; episodes without a number
/// are skipped.
pub fn playlist_videos(item_id: &str, episodes: &[PlaylistEpisode]) -> Vec<Video> {
    let mut seen = HashSet::new();
    let mut videos = Vec::new();

    for ep in episodes {
        if !seen.insert((ep.season_title.as_str(), ep.episode_title.as_str())) {
            continue;
        }
        let Some(episode) = first_number(&ep.episode_title) else {
            debug!("No episode number in '{}'", ep.episode_title);
            continue;
        };
        videos.push(Video {
            id: format!("{}/{}/{}", item_id, ep.season_title, ep.episode_title),
            title: ep.episode_title.clone(),
            thumbnail: ep.poster.clone(),
            released: None,
            season: Some(first_number(&ep.season_title).unwrap_or(1)),
            episode: Some(episode),
        });
    }

    sort_videos(&mut videos);
    videos
}

/// Split `{item}/{season title}/{episode title}`; a bare item id is a movie
pub fn split_video_id(video_id: &str) -> (&str, Option<(&str, &str)>) {
    let mut parts = video_id.splitn(3, '/');
    let item_id = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (Some(season), Some(episode)) => (item_id, Some((season, episode))),
        _ => (video_id, None),
    }
}

/// eneyida.tv source
pub struct EneyidaSource {
    config: SourceConfig,
}

impl EneyidaSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    fn detail_url(&self, item_id: &str) -> String {
        detail_url(&self.config.base_url, item_id)
    }

    fn player_url(&self, detail: &DetailPage, item_id: &str) -> Result<String> {
        detail
            .player
            .as_deref()
            .and_then(|src| absolutize(&self.config.base_url, src))
            .ok_or_else(|| ScrapeError::missing(format!("player iframe on {}", item_id)))
    }
}

#[async_trait]
impl SourceSite for EneyidaSource {
    fn key(&self) -> &'static str {
        "eneyida"
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
        info!("📄 Fetching eneyida detail page: {}", url);
        let html = session.get_page(&url).await?;
        let videos = videos_or_empty(self, session, &html, id, content_type).await;
        Ok(DetailPage::parse(&self.config.base_url, &html).into_series(id, content_type, videos))
    }

    async fn fetch_videos(
        &self,
        session: &Session,
        detail_html: &str,
        id: &str,
        _content_type: ContentType,
    ) -> Result<Vec<Video>> {
        let detail = DetailPage::parse(&self.config.base_url, detail_html);
        let player_url = self.player_url(&detail, id)?;

        if detail.is_movie_player() {
            return Ok(vec![Video {
                id: id.to_string(),
                title: detail.title.clone().unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
                thumbnail: detail.background.clone(),
                released: None,
                season: None,
                episode: None,
            }]);
        }

        let html = fetch_player_page(session, &player_url, &self.detail_url(id))
            .await?
            .ok_or_else(|| ScrapeError::missing(format!("player page {}", player_url)))?;
        let dubs = script::parse_file_playlist(&script::script_text(&html))?;
        let videos = playlist_videos(id, &script::flatten_playlist(&dubs));
        info!("📺 Found {} episodes for {}", videos.len(), id);
        Ok(videos)
    }

    async fn fetch_streams(&self, session: &Session, _content_type: ContentType, video_id: &str) -> Result<Vec<Stream>> {
        let (item_id, episode) = split_video_id(video_id);
        let url = self.detail_url(item_id);
        info!("📄 Fetching eneyida detail page: {}", url);
        let html = session.get_page(&url).await?;
        let player_url = self.player_url(&DetailPage::parse(&self.config.base_url, &html), item_id)?;

        let Some(player_html) = fetch_player_page(session, &player_url, &url).await? else {
            return Ok(Vec::new());
        };

        match (script::parse_player_source(&script::script_text(&player_html))?, episode) {
            (PlayerSource::Direct(file), _) => Ok(vec![Stream {
                name: MOVIE_STREAM.to_string(),
                url: file,
            }]),
            (PlayerSource::Playlist(dubs), Some((season, episode))) => {
                let streams = script::select_streams(&dubs, season, episode);
                if streams.is_empty() {
                    warn!("No dub offers {} / {} of {}", season, episode, item_id);
                }
                Ok(streams)
            }
            (PlayerSource::Playlist(_), None) => Err(ScrapeError::InvalidId(video_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::script::{flatten_playlist, parse_file_playlist};

    const BASE: &str = "https://eneyida.tv";

    const LISTING: &str = r#"<html><body>
        <article class="short">
            <a class="short_img"><img data-src="/uploads/p1.webp"></a>
            <a class="short_title" href="https://eneyida.tv/12345-name.html">Назва</a>
            <div class="short_subtitle">2023 • Драма</div>
        </article>
        <article class="short"><div class="short_subtitle">no link</div></article>
    </body></html>"#;

    const SERIES_DETAIL: &str = r#"<html><body>
        <div class="full_header__bg-img" style="background-image: url('/uploads/bg.jpg');"></div>
        <div class="full_header-title"><h1>Серіал</h1></div>
        <div class="full_content-poster"><img src="/uploads/poster.jpg"></div>
        <ul class="full_info">
            <li><span>Рік:</span> <a>2023</a></li>
            <li><span>Жанр:</span> <a>Драма</a>, <a>Комедія</a></li>
            <li><span>Режисер:</span> <a>Олена Ковальчук</a></li>
        </ul>
        <article class="full_content-desc"> Опис </article>
        <div class="tabs_b visible"><iframe src="https://hdvbua.pro/embed/42"></iframe></div>
    </body></html>"#;

    const PLAYER: &str = r#"<html><body><script>
        new Playerjs({id:"p", file: '[
            {"title":"Дубляж","folder":[{"title":"Сезон 1","folder":[
                {"title":"Серія 2","file":"https://cdn/d/s1e2.m3u8","poster":"https://cdn/2.jpg"},
                {"title":"Серія 1","file":"https://cdn/d/s1e1.m3u8","poster":"https://cdn/1.jpg"}]}]},
            {"title":"Субтитри","folder":[{"title":"Сезон 1","folder":[
                {"title":"Серія 1","file":"https://cdn/s/s1e1.m3u8"},
                {"title":"Трейлер","file":"https://cdn/s/t.m3u8"}]}]}
        ]'});
    </script></body></html>"#;

    #[test]
    fn test_parse_previews() {
        let previews = parse_previews(BASE, LISTING, ContentType::Series);
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].id, "12345-name");
        assert_eq!(previews[0].poster.as_deref(), Some("https://eneyida.tv/uploads/p1.webp"));
        assert_eq!(previews[0].description, "2023 • Драма");
    }

    #[test]
    fn test_detail_page_fields() {
        let detail = DetailPage::parse(BASE, SERIES_DETAIL);
        assert!(!detail.is_movie_player());
        assert_eq!(detail.background.as_deref(), Some("https://eneyida.tv/uploads/bg.jpg"));

        let series = detail.into_series("12345-name", ContentType::Series, Vec::new());
        assert_eq!(series.name, "Серіал");
        assert_eq!(series.genres, vec!["Драма", "Комедія"]);
        assert_eq!(series.director, vec!["Олена Ковальчук"]);
        assert_eq!(series.poster.as_deref(), Some("https://eneyida.tv/uploads/poster.jpg"));
        assert_eq!(series.description, "Опис");
    }

    #[test]
    fn test_plain_text_and_lowercase_rows() {
        let html = r#"<ul class="full_info">
            <li><span>Жанр:</span> Драма, Комедія</li>
            <li><span>режисер:</span> <a>Олена</a></li>
            <li><span>Тривалість:</span> 2 год 5 хв</li>
        </ul>"#;
        let detail = DetailPage::parse(BASE, html);
        assert_eq!(detail.genres, vec!["Драма", "Комедія"]);
        assert_eq!(detail.director, vec!["Олена"]);
        assert_eq!(detail.runtime.as_deref(), Some("2 год 5 хв"));

        let html = r#"<ul class="full_info"><li><span>Режисер:</span> Олена Ковальчук, Іван Петренко</li></ul>"#;
        assert_eq!(DetailPage::parse(BASE, html).director, vec!["Олена Ковальчук", "Іван Петренко"]);
    }

    #[test]
    fn test_empty_lazy_poster_is_absent() {
        let html = r#"<article class="short">
            <img data-src="">
            <a class="short_title" href="https://eneyida.tv/1-a.html">A</a>
        </article>
        <article class="short">
            <img data-src="" src="/uploads/fallback.jpg">
            <a class="short_title" href="https://eneyida.tv/2-b.html">B</a>
        </article>"#;
        let previews = parse_previews(BASE, html, ContentType::Movie);
        assert_eq!(previews[0].poster, None);
        assert_eq!(previews[1].poster.as_deref(), Some("https://eneyida.tv/uploads/fallback.jpg"));
    }

    #[test]
    fn test_dotted_slug_keeps_whole_id() {
        let html = r#"<article class="short"><a class="short_title" href="https://eneyida.tv/123-dr.house.html">Доктор Хаус</a></article>"#;
        let previews = parse_previews(BASE, html, ContentType::Series);
        assert_eq!(previews[0].id, "123-dr.house");
        assert_eq!(detail_url(BASE, &previews[0].id), "https://eneyida.tv/123-dr.house.html");
    }

    #[test]
    fn test_unlabelled_rows_use_second_row() {
        let html = r#"<ul class="full_info"><li><a>2020</a></li><li><a>Жахи</a></li></ul>"#;
        let detail = DetailPage::parse(BASE, html);
        assert_eq!(detail.genres, vec!["Жахи"]);
        assert_eq!(detail.background, None);
    }

    #[test]
    fn test_movie_player_detection() {
        let detail = DetailPage::parse(
            BASE,
            r#"<div class="tabs_b visible"><iframe src="https://hdvbua.pro/vid/77"></iframe></div>"#,
        );
        assert!(detail.is_movie_player());
    }

    #[test]
    fn test_playlist_videos() {
        let dubs = parse_file_playlist(&script::script_text(PLAYER)).unwrap();
        let videos = playlist_videos("12345-name", &flatten_playlist(&dubs));

        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["12345-name/Сезон 1/Серія 1", "12345-name/Сезон 1/Серія 2"]);
        assert_eq!(videos[0].season, Some(1));
        assert_eq!(videos[0].thumbnail.as_deref(), Some("https://cdn/1.jpg"));
    }

    #[test]
    fn test_streams_across_dubs() {
        let dubs = parse_file_playlist(&script::script_text(PLAYER)).unwrap();
        let streams = script::select_streams(&dubs, "Сезон 1", "Серія 1");
        let names: Vec<&str> = streams.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Дубляж", "Субтитри"]);
    }

    #[test]
    fn test_split_video_id() {
        assert_eq!(split_video_id("12345-name/Сезон 1/Серія 1"), ("12345-name", Some(("Сезон 1", "Серія 1"))));
        assert_eq!(split_video_id("12345-name"), ("12345-name", None));
    }
}
