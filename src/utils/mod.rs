//! Utility functions and helpers.

pub mod http;
pub mod text;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve `href` against the base URL string, leaving absolute links untouched.
pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base_url) {
        Ok(base) => resolve_url(&base, href),
        Err(_) => href.to_string(),
    }
}

/// Percent-encode a search keyword for use in a query string.
pub fn encode_keyword(keyword: &str) -> String {
    urlencoding::encode(keyword).into_owned()
}
