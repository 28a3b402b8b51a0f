// src/outlets/maeililbo.rs

//! Maeil Ilbo (m-i.kr). Served as static HTML.

use scraper::Html;

use super::{OutletAdapter, body_text, parse_selector};
use crate::error::Result;
use crate::models::{Article, SearchResult};
use crate::utils::encode_keyword;
use crate::utils::text::{inline_text, parse_datetime};

pub const CHANNEL: &str = "maeililbo";
const BASE_URL: &str = "https://www.m-i.kr";

const LIST_ITEM: &str = "li.clearfix";
const LINK: &str = "div.auto-titles a[href*='articleView']";
const TITLE: &str = "div.auto-titles a";
const BODY: &str = "div#article-view-content-div";
const DATE_ITEMS: &str = "ul.infomation li, ul.auto-infomation li, i";

/// Label preceding the publication time in the article info list.
const APPROVED_LABEL: &str = "승인";

const DATE_FORMATS: &[&str] = &["%Y.%m.%d %H:%M", "%Y.%m.%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Default, Clone, Copy)]
pub struct MaeililboAdapter;

impl OutletAdapter for MaeililboAdapter {
    fn channel_name(&self) -> &'static str {
        CHANNEL
    }

    fn build_search_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{BASE_URL}/news/articleList.html?sc_word={}&page={page}",
            encode_keyword(keyword)
        )
    }

    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);
        let item_selector = parse_selector(LIST_ITEM)?;
        let link_selector = parse_selector(LINK)?;
        let title_selector = parse_selector(TITLE)?;

        let results = document
            .select(&item_selector)
            .filter_map(|item| {
                let link = item.select(&link_selector).next()?;
                let href = link.value().attr("href").filter(|h| !h.is_empty())?;
                let url = if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{BASE_URL}{href}")
                };

                let title = item
                    .select(&title_selector)
                    .next()
                    .map(|t| inline_text(&t))
                    .unwrap_or_else(|| inline_text(&link));
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
}

fn published_at(document: &Html) -> Option<chrono::NaiveDateTime> {
    let selector = parse_selector(DATE_ITEMS).ok()?;
    document
        .select(&selector)
        .map(|item| inline_text(&item))
        .filter(|text| text.contains(APPROVED_LABEL))
        .find_map(|text| parse_datetime(&text.replace(APPROVED_LABEL, ""), DATE_FORMATS))
}
