//! Player script parsing
//!
//! Player pages initialize a Playerjs-style object in inline script text.
//! The media reference comes in two shapes:
//!
//! - a plain string: `file: "https://cdn/x/index.m3u8"`
//! - a single-quoted JSON playlist:
//!   `file: '[{"title":"Dub","folder":[{"title":"1 сезон","folder":[{"title":"1 серія","file":"..."}]}]}]'`
//!
//! Candidate patterns are tried strictest first.

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::models::Stream;

/// Quoted manifest URL, then any quoted value of the same field
static FILE_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"file\s*:\s*"([^"]+\.m3u8[^"]*)""#,
        r#"file\s*:\s*"([^"]+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid file url pattern"))
    .collect()
});

static FILE_PLAYLIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)file\s*:\s*'(\[.*?\])'").expect("Invalid file playlist pattern")
});

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("Invalid script selector"));

/// One node of a player playlist: a dub, a season or an episode
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerNode {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub folder: Vec<PlayerNode>,
}

/// Leaf of a dub→season→episode playlist with its ancestry
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEpisode {
    pub dub: String,
    pub season_title: String,
    pub episode_title: String,
    pub file: String,
    pub poster: Option<String>,
}

/// What a player page exposes
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSource {
    /// A single playable URL
    Direct(String),
    /// A structured dub→season→episode playlist
    Playlist(Vec<PlayerNode>),
}

/// Inline script text of a player page.
///
/// Falls back to the whole page when it has no `<script>` element, since
/// some players are served as bare script bodies.
pub fn script_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let scripts: Vec<String> = document
        .select(&SCRIPT_SELECTOR)
        .map(|s| s.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect();

    if scripts.is_empty() {
        html.to_string()
    } else {
        scripts.join("\n")
    }
}

/// Playable URL assigned to `file`, strict manifest form first
pub fn find_file_url(script: &str) -> Option<String> {
    for (i, pattern) in FILE_URL_PATTERNS.iter().enumerate() {
        if let Some(url) = pattern.captures(script).and_then(|c| c.get(1)) {
            debug!("file url matched by pattern {}", i);
            return Some(url.as_str().to_string());
        }
    }
    None
}

/// Raw JSON text of a single-quoted `file: '[...]'` playlist
pub fn find_file_playlist(script: &str) -> Option<&str> {
    FILE_PLAYLIST_PATTERN
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Decode the structured playlist embedded in `script`
pub fn parse_file_playlist(script: &str) -> Result<Vec<PlayerNode>> {
    let raw = find_file_playlist(script)
        .ok_or_else(|| ScrapeError::pattern("file playlist array"))?;
    Ok(serde_json::from_str(raw)?)
}

/// Classify a player script: a plain URL wins over a structured playlist
pub fn parse_player_source(script: &str) -> Result<PlayerSource> {
    if let Some(url) = find_file_url(script) {
        return Ok(PlayerSource::Direct(url));
    }
    parse_file_playlist(script).map(PlayerSource::Playlist)
}

/// Flatten dubs → seasons → episodes, skipping nodes without a file
pub fn flatten_playlist(dubs: &[PlayerNode]) -> Vec<PlaylistEpisode> {
    let mut episodes = Vec::new();
    for dub in dubs {
        for season in &dub.folder {
            for episode in &season.folder {
                match &episode.file {
                    Some(file) if !file.is_empty() => episodes.push(PlaylistEpisode {
                        dub: dub.title.trim().to_string(),
                        season_title: season.title.trim().to_string(),
                        episode_title: episode.title.trim().to_string(),
                        file: file.clone(),
                        poster: episode.poster.clone().filter(|p| !p.is_empty()),
                    }),
                    _ => debug!("Skipping playlist node without file: {}", episode.title),
                }
            }
        }
    }
    episodes
}

/// One stream per dub carrying the requested season and episode titles
pub fn select_streams(dubs: &[PlayerNode], season_title: &str, episode_title: &str) -> Vec<Stream> {
    flatten_playlist(dubs)
        .into_iter()
        .filter(|ep| ep.season_title == season_title.trim() && ep.episode_title == episode_title.trim())
        .map(|ep| Stream { name: ep.dub, url: ep.file })
        .collect()
}
