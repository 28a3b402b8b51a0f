// src/outlets/mk.rs

//! Maeil Business Newspaper (mk.co.kr). Rendered in the browser.

use scraper::Html;

use super::{OutletAdapter, body_text, parse_selector};
use crate::error::Result;
use crate::models::{Article, SearchResult};
use crate::utils::text::{clean_text, parse_datetime};
use crate::utils::{absolute_url, encode_keyword};

pub const CHANNEL: &str = "mk";
const BASE_URL: &str = "https://www.mk.co.kr";

const LIST_ITEM: &str = "li.news_node";
const LINK: &str = "a[href*='/news/']";
const BODY: &str = "div.news_cnt_detail_wrap";
const DATE: &str = "time";

const DATE_FORMATS: &[&str] = &[
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct MkAdapter;

impl OutletAdapter for MkAdapter {
    fn channel_name(&self) -> &'static str {
        CHANNEL
    }

    fn build_search_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{BASE_URL}/search?word={}&page={page}",
            encode_keyword(keyword)
        )
    }

    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);
        let item_selector = parse_selector(LIST_ITEM)?;
        let link_selector = parse_selector(LINK)?;

        let results = document
            .select(&item_selector)
            .filter_map(|item| {
                let link = item.select(&link_selector).next()?;
                let href = link.value().attr("href").filter(|h| !h.is_empty())?;
                let title = clean_text(&link.text().collect::<String>());
                if title.is_empty() {
                    return None;
                }
                Some(SearchResult::new(title, absolute_url(BASE_URL, href)))
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
        Some(LIST_ITEM)
    }

    fn detail_wait_selector(&self) -> Option<&'static str> {
        Some(BODY)
    }
}

fn published_at(document: &Html) -> Option<chrono::NaiveDateTime> {
    let selector = parse_selector(DATE).ok()?;
    let element = document.select(&selector).next()?;
    let text = clean_text(&element.text().collect::<String>());

    // "입력 : 2026.02.16 18:02"
    let text = match text.split_once(':') {
        Some((_, rest)) if !text.starts_with(|c: char| c.is_ascii_digit()) => rest.trim(),
        _ => text.as_str(),
    };
    parse_datetime(text, DATE_FORMATS)
}
