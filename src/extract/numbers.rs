//! Numeric token extraction from free-form labels
//!
//! Episode and season numbers are embedded in display text such as
//! "Серія 12", "2 сезон" or "12 серія (оригінал)".

use regex::Regex;
use std::sync::LazyLock;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid number pattern"));

/// "3 сезон", "3  Сезон"
static SEASON_COUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s+сезон").expect("Invalid season pattern"));

/// All integers in `text`, in order of appearance.
/// Tokens too large for `u32` are skipped.
pub fn extract_numbers(text: &str) -> Vec<u32> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect()
}

/// First integer embedded in `text`
pub fn first_number(text: &str) -> Option<u32> {
    extract_numbers(text).into_iter().next()
}

/// Season number announced in a page title ("Назва 2 сезон")
pub fn season_in_title(title: &str) -> Option<u32> {
    SEASON_COUNT_PATTERN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
