//! URL helpers shared by the source pipelines

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static CSS_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("Invalid css url pattern")
});

/// Give protocol-relative URLs (`//host/path`) an explicit secure scheme
pub fn promote_scheme(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Resolve a possibly site-relative `src` against the site base URL.
///
/// An empty `src` (lazy-load placeholder) resolves to nothing.
pub fn absolutize(base: &str, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    if src.starts_with("//") {
        return Some(promote_scheme(src));
    }
    Some(match Url::parse(base).and_then(|b| b.join(src)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.trim_end_matches('/'), src),
    })
}

/// Detail page URL for an item id
pub fn detail_url(base: &str, item_id: &str) -> String {
    format!("{}/{}.html", base.trim_end_matches('/'), item_id.trim_matches('/'))
}

/// Item id from a canonical link: site base, leading slash and `.html` removed.
///
/// `https://uakino.me/filmy/genre_comedy/123-name.html` → `filmy/genre_comedy/123-name`
pub fn item_id_from_href(base: &str, href: &str) -> String {
    let base = base.trim_end_matches('/');
    href.trim()
        .strip_prefix(base)
        .unwrap_or(href.trim())
        .trim_start_matches('/')
        .trim_end_matches(".html")
        .to_string()
}

/// Item id from the last path segment of a link, without extension.
///
/// `https://eneyida.tv/12345-name.html` → `12345-name`
pub fn item_id_from_last_segment(href: &str) -> String {
    let segment = href.trim().trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, _extension)) => stem.to_string(),
        None => segment.to_string(),
    }
}

/// First `url(...)` reference inside an inline style attribute
pub fn css_background_url(style: &str) -> Option<String> {
    CSS_URL_PATTERN
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_scheme() {
        assert_eq!(promote_scheme("//ashdi.vip/vod/123"), "https://ashdi.vip/vod/123");
        assert_eq!(promote_scheme("http://ashdi.vip/vod/123"), "http://ashdi.vip/vod/123");
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://uakino.me", "/uploads/p.jpg").as_deref(),
            Some("https://uakino.me/uploads/p.jpg")
        );
        assert_eq!(
            absolutize("https://uakino.me", "https://cdn.me/p.jpg").as_deref(),
            Some("https://cdn.me/p.jpg")
        );
        assert_eq!(
            absolutize("http://127.0.0.1:8080", "//img.me/p.jpg").as_deref(),
            Some("https://img.me/p.jpg")
        );
        assert_eq!(absolutize("https://eneyida.tv", ""), None);
        assert_eq!(absolutize("https://eneyida.tv", "  "), None);
    }

    #[test]
    fn test_item_id_round_trip() {
        let base = "https://uakino.me";
        let href = "https://uakino.me/filmy/genre_comedy/123-name.html";
        let id = item_id_from_href(base, href);
        assert_eq!(id, "filmy/genre_comedy/123-name");
        assert_eq!(detail_url(base, &id), href);

        assert_eq!(item_id_from_href(base, "/seriesss/77-show.html"), "seriesss/77-show");
    }

    #[test]
    fn test_last_segment_id() {
        assert_eq!(item_id_from_last_segment("https://eneyida.tv/12345-name.html"), "12345-name");
        assert_eq!(item_id_from_last_segment("/films/9-x.html"), "9-x");
        assert_eq!(item_id_from_last_segment("https://eneyida.tv/123-dr.house.html"), "123-dr.house");
        assert_eq!(item_id_from_last_segment("https://eneyida.tv/55-plain"), "55-plain");

        let id = item_id_from_last_segment("https://eneyida.tv/123-dr.house.html");
        assert_eq!(detail_url("https://eneyida.tv", &id), "https://eneyida.tv/123-dr.house.html");
    }

    #[test]
    fn test_css_background_url() {
        assert_eq!(
            css_background_url("background-image: url('/uploads/bg.jpg');").as_deref(),
            Some("/uploads/bg.jpg")
        );
        assert_eq!(css_background_url("color: red"), None);
    }
}
