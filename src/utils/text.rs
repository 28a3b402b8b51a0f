//! Text normalisation helpers shared by the outlet parsers.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::ElementRef;

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex"));

/// Collapse runs of spaces and tabs, trim every line and drop blank lines.
pub fn clean_text(text: &str) -> String {
    let collapsed = HORIZONTAL_SPACE.replace_all(text, " ");
    collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// All text below `element`, one text node per line, cleaned.
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join("\n"))
}

/// Trimmed text nodes below `element` concatenated without separators.
pub fn inline_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// Parse a timestamp, trying RFC 3339 first and then each of `formats`.
///
/// Formats without a time component yield midnight.
pub fn parse_datetime(text: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in formats {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
