//! Local stand-in for both sites, serving recorded page shapes
#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use stremio_ua::{Config, ConfigBuilder};
use tokio::net::TcpListener;

pub const UAKINO_LISTING: &str = include_str!("../fixtures/uakino/listing.html");
pub const UAKINO_SERIES: &str = include_str!("../fixtures/uakino/series.html");
pub const UAKINO_BROKEN_SERIES: &str = include_str!("../fixtures/uakino/broken_series.html");
pub const UAKINO_PLAYLIST: &str = include_str!("../fixtures/uakino/playlist.html");
pub const UAKINO_MOVIE: &str = include_str!("../fixtures/uakino/movie.html");
pub const UAKINO_PLAYER: &str = include_str!("../fixtures/uakino/player.html");

pub const ENEYIDA_LISTING: &str = include_str!("../fixtures/eneyida/listing.html");
pub const ENEYIDA_SERIES: &str = include_str!("../fixtures/eneyida/series.html");
pub const ENEYIDA_MOVIE: &str = include_str!("../fixtures/eneyida/movie.html");
pub const ENEYIDA_SERIES_PLAYER: &str = include_str!("../fixtures/eneyida/series_player.html");
pub const ENEYIDA_MOVIE_PLAYER: &str = include_str!("../fixtures/eneyida/movie_player.html");

pub const UAKINO_SERIES_LISTING_PATH: &str = "/seriesss/f/c.year=1980,2025/sort=d.year;desc/";

/// Start the fixture server and return its base URL
pub async fn spawn_fixture_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new().fallback(fixture).with_state(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

/// Configuration pointing both sites at `base`
pub fn fixture_config(base: &str) -> Config {
    ConfigBuilder::new()
        .with_uakino_url(base)
        .with_eneyida_url(base)
        .with_timeout(5)
        .build()
}

fn html(body: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Body::from("not found")).into_response()
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Body::from("forbidden")).into_response()
}

fn page(template: &str, base: &str) -> Response {
    html(template.replace("{base}", base))
}

fn player(file: &str) -> Response {
    html(UAKINO_PLAYER.replace("{file}", file))
}

fn header_is(headers: &HeaderMap, name: &str, expected: &str) -> bool {
    headers.get(name).and_then(|v| v.to_str().ok()) == Some(expected)
}

async fn fixture(State(base): State<String>, uri: Uri, headers: HeaderMap) -> Response {
    let query = uri.query().unwrap_or_default();
    let series_page = format!("{}/seriesss/drama/100-show.html", base);

    match uri.path() {
        // uakino
        UAKINO_SERIES_LISTING_PATH => page(UAKINO_LISTING, &base),
        "/seriesss/f/c.year=1980,2025/sort=d.year;desc/page/2/" => html("<html><body></body></html>".to_string()),
        "/seriesss/drama/100-show.html" => page(UAKINO_SERIES, &base),
        "/seriesss/comedy/300-broken.html" => page(UAKINO_BROKEN_SERIES, &base),
        "/filmy/comedy/200-film.html" => page(UAKINO_MOVIE, &base),
        "/filmy/comedy/201-gone.html" => page(&UAKINO_MOVIE.replace("/player/film", "/player/missing"), &base),
        "/engine/ajax/playlists.php" => {
            if !header_is(&headers, "x-requested-with", "XMLHttpRequest") {
                return forbidden();
            }
            let body = if query.contains("news_id=555") && query.contains("xfield=playlist") {
                serde_json::json!({"success": true, "response": UAKINO_PLAYLIST.replace("{base}", &base)})
            } else {
                serde_json::json!({"success": false, "message": "playlist not found"})
            };
            (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body.to_string()).into_response()
        }
        "/player/show-1" | "/player/show-2" => {
            if !header_is(&headers, "referer", &series_page) {
                return forbidden();
            }
            let episode = uri.path().trim_start_matches("/player/show-");
            player(&format!("https://cdn.uakino.test/show/s2e{}/index.m3u8", episode))
        }
        "/player/show-1-sub" => player("https://cdn.uakino.test/show/s2e1-sub/index.m3u8"),
        "/player/film" => player("https://cdn.uakino.test/film/index.m3u8"),

        // eneyida
        "/series/" => page(ENEYIDA_LISTING, &base),
        "/12345-show.html" => page(ENEYIDA_SERIES, &base),
        "/777-film.html" => page(ENEYIDA_MOVIE, &base),
        "/eplayer/12345" => html(ENEYIDA_SERIES_PLAYER.to_string()),
        "/vid/777" => html(ENEYIDA_MOVIE_PLAYER.to_string()),

        _ => not_found(),
    }
}
