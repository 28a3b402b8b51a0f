// src/outlets/naver_news.rs

//! Naver News search (search.naver.com).
//!
//! Result markup carries no stable class names, so each link to
//! `n.news.naver.com` is walked up to its item container and the headline is
//! taken from the container's first external link with a long enough text.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};

use super::{OutletAdapter, body_text, parse_selector};
use crate::error::Result;
use crate::models::{Article, SearchResult};
use crate::utils::encode_keyword;
use crate::utils::text::{clean_text, inline_text, parse_datetime};

pub const CHANNEL: &str = "naver_news";
const SEARCH_URL: &str = "https://search.naver.com/search.naver";
const RESULTS_PER_PAGE: u32 = 10;

const NEWS_LINK: &str = "a[href*='n.news.naver.com']";
/// Ancestor levels between a news link and its item container.
const CONTAINER_DEPTH: usize = 4;
/// Headlines are longer than this many characters.
const MIN_TITLE_CHARS: usize = 10;

const BODY: &str = "article#dic_area";
const DATE: &str = "span.media_end_head_info_datestamp_time";
const DATE_ATTR: &str = "data-date-time";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d. %H:%M",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct NaverNewsAdapter;

impl OutletAdapter for NaverNewsAdapter {
    fn channel_name(&self) -> &'static str {
        CHANNEL
    }

    fn build_search_url(&self, keyword: &str, page: u32) -> String {
        let start = page.saturating_sub(1) * RESULTS_PER_PAGE + 1;
        format!(
            "{SEARCH_URL}?where=news&query={}&start={start}&sort=1",
            encode_keyword(keyword)
        )
    }

    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);
        let news_selector = parse_selector(NEWS_LINK)?;
        let link_selector = parse_selector("a[href]")?;
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for link in document.select(&news_selector) {
            let Some(url) = link.value().attr("href").filter(|h| !h.is_empty()) else {
                continue;
            };
            if seen.contains(url) {
                continue;
            }
            let Some(container) = news_container(link) else {
                continue;
            };
            let Some(title) = container
                .select(&link_selector)
                .find_map(|candidate| headline(&candidate))
            else {
                continue;
            };

            seen.insert(url.to_string());
            results.push(SearchResult::new(title, url));
        }

        Ok(results)
    }

    fn parse_article(&self, html: &str, result: &SearchResult, keyword: &str) -> Result<Article> {
        let document = Html::parse_document(html);
        let content = body_text(&document, BODY, &result.url)?;

        Ok(Article::new(result, content, CHANNEL, keyword)
            .with_published_at(published_at(&document)))
    }
}

/// The ancestor `CONTAINER_DEPTH + 1` levels above `link`, unless the walk
/// reaches `<body>` first.
fn news_container(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = link.parent()?;
    for _ in 0..CONTAINER_DEPTH {
        let element = ElementRef::wrap(node)?;
        if element.value().name() == "body" {
            return None;
        }
        node = node.parent()?;
    }
    ElementRef::wrap(node)
}

/// Headline text of `link` if it points at the publisher's own site.
fn headline(link: &ElementRef<'_>) -> Option<String> {
    let href = link.value().attr("href")?;
    if !href.starts_with("http") || href.contains("naver.com") || href.contains("search.naver") {
        return None;
    }
    let text = inline_text(link);
    (text.chars().count() > MIN_TITLE_CHARS).then(|| clean_text(&text))
}

fn published_at(document: &Html) -> Option<NaiveDateTime> {
    let selector = parse_selector(DATE).ok()?;
    let element = document.select(&selector).next()?;

    match element.value().attr(DATE_ATTR) {
        Some(value) if !value.is_empty() => parse_datetime(value, DATE_FORMATS),
        _ => parse_datetime(&clean_text(&element.text().collect::<String>()), DATE_FORMATS),
    }
}
