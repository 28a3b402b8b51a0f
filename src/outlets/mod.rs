// src/outlets/mod.rs

//! Per-outlet URL building and page parsing.
//!
//! Adapters are stateless: the keyword being crawled is passed into
//! [`OutletAdapter::parse_article`] rather than stored, so one adapter value
//! never carries state between tasks.

pub mod chosun;
pub mod hani;
pub mod maeililbo;
pub mod mk;
pub mod naver_news;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Article, SearchResult};
use crate::utils::text::element_text;

pub use chosun::ChosunAdapter;
pub use hani::HaniAdapter;
pub use maeililbo::MaeililboAdapter;
pub use mk::MkAdapter;
pub use naver_news::NaverNewsAdapter;

/// Outlet-specific knowledge needed by the crawl loop.
pub trait OutletAdapter: Send + Sync {
    /// Channel name stamped on every result and article.
    fn channel_name(&self) -> &'static str;

    /// Search page URL for `keyword`, 1-based `page`.
    fn build_search_url(&self, keyword: &str, page: u32) -> String;

    /// Extract the result entries from a search page, in page order.
    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>>;

    /// Build the article from its detail page.
    fn parse_article(&self, html: &str, result: &SearchResult, keyword: &str)
    -> Result<Article>;

    /// Selector a rendered search page must contain before capture.
    fn search_wait_selector(&self) -> Option<&'static str> {
        None
    }

    /// Selector a rendered detail page must contain before capture.
    fn detail_wait_selector(&self) -> Option<&'static str> {
        None
    }
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Cleaned text of the first element matching `selector`.
///
/// Fails when the element is missing or holds no text.
pub(crate) fn body_text(document: &Html, selector: &str, url: &str) -> Result<String> {
    let selector = parse_selector(selector)?;
    let body = document
        .select(&selector)
        .next()
        .ok_or_else(|| AppError::parse(format!("article body not found: {url}")))?;

    let content = element_text(&body);
    if content.is_empty() {
        return Err(AppError::parse(format!("article body is empty: {url}")));
    }
    Ok(content)
}
