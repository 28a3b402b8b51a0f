// src/outlets/hani.rs

//! Hankyoreh (hani.co.kr). Search results are script-rendered.

use std::collections::HashSet;

use scraper::Html;

use super::{OutletAdapter, body_text, parse_selector};
use crate::error::Result;
use crate::models::{Article, SearchResult};
use crate::utils::text::{inline_text, parse_datetime};
use crate::utils::{absolute_url, encode_keyword};

pub const CHANNEL: &str = "hani";
const BASE_URL: &str = "https://www.hani.co.kr";
const SEARCH_URL: &str = "https://search.hani.co.kr/";

/// Path segment shared by every article URL.
const ARTICLE_PATH: &str = "/arti/";

const SEARCH_WAIT: &str = "div.search-inner";
const BODY: &str = "div.article-text, div.text";
const DATE: &str = "span.date-time, p.date-time, span.date_info";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct HaniAdapter;

impl OutletAdapter for HaniAdapter {
    fn channel_name(&self) -> &'static str {
        CHANNEL
    }

    fn build_search_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{SEARCH_URL}?command=query&keyword={}&media=news&sort=d&pageseq={page}",
            encode_keyword(keyword)
        )
    }

    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);
        let link_selector = parse_selector("a[href]")?;
        let mut seen = HashSet::new();

        let results = document
            .select(&link_selector)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                if !href.contains(ARTICLE_PATH) {
                    return None;
                }
                let url = absolute_url(BASE_URL, href);
                if !seen.insert(url.clone()) {
                    return None;
                }
                let title = inline_text(&link);
                if title.is_empty() {
                    return None;
                }
                Some(SearchResult::new(title, url))
            })
            .collect();

        Ok(results)
    }

    fn parse_article(&self, html: &str, result: &SearchResult, keyword: &str) -> Result<Article> {
        let document = Html::parse_document(html);
        let content = body_text(&document, BODY, &result.url)?;

        Ok(Article::new(result, content, CHANNEL, keyword)
            .with_published_at(published_at(&document)))
    }

    fn search_wait_selector(&self) -> Option<&'static str> {
        Some(SEARCH_WAIT)
    }
}

fn published_at(document: &Html) -> Option<chrono::NaiveDateTime> {
    let selector = parse_selector(DATE).ok()?;
    let text = inline_text(&document.select(&selector).next()?);
    let parsed = parse_datetime(&text, DATE_FORMATS);
    if parsed.is_none() {
        log::debug!("{CHANNEL}: unrecognised date '{text}'");
    }
    parsed
}
