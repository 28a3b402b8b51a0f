// src/outlets/chosun.rs

//! Chosun Ilbo (chosun.com). A Next.js site rendered in the browser.
//!
//! Both search and article pages embed their data as JSON in
//! `script#__NEXT_DATA__`; that payload is read first and the rendered
//! markup is only used when it yields nothing.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use scraper::Html;
use serde_json::Value;

use super::{OutletAdapter, parse_selector};
use crate::error::{AppError, Result};
use crate::models::{Article, SearchResult};
use crate::utils::text::{clean_text, element_text, parse_datetime};
use crate::utils::{absolute_url, encode_keyword};

pub const CHANNEL: &str = "chosun";
const BASE_URL: &str = "https://www.chosun.com";

const NEXT_DATA: &str = "script#__NEXT_DATA__";
const LIST_ITEM: &str = "div.search-feed div.story-card";
const LINK: &str = "a.story-card__headline, a[href*='/article/']";
const TITLE: &str = "a.story-card__headline, div.story-card__headline";
const BODY: &str = "section.article-body";
const DATE: &str = "meta[property='article:published_time'], time";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y.%m.%d",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ChosunAdapter;

impl OutletAdapter for ChosunAdapter {
    fn channel_name(&self) -> &'static str {
        CHANNEL
    }

    fn build_search_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{BASE_URL}/nsearch/?query={}&page={page}&siteid=www&sort=1",
            encode_keyword(keyword)
        )
    }

    fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        if let Some(data) = next_data(&document) {
            let results = search_results_from_next_data(&data);
            if !results.is_empty() {
                log::debug!("{CHANNEL}: {} results from page data", results.len());
                return Ok(results);
            }
        }

        let results = search_results_from_markup(&document)?;
        log::debug!("{CHANNEL}: {} results from markup", results.len());
        Ok(results)
    }

    fn parse_article(&self, html: &str, result: &SearchResult, keyword: &str) -> Result<Article> {
        let document = Html::parse_document(html);

        let data = next_data(&document);
        let mut content = data.as_ref().map(content_from_next_data).unwrap_or_default();
        let mut published_at = data.as_ref().and_then(date_from_next_data);

        if content.is_empty() {
            let body_selector = parse_selector(BODY)?;
            if let Some(body) = document.select(&body_selector).next() {
                content = element_text(&body);
            }
            if published_at.is_none() {
                published_at = date_from_markup(&document);
            }
        }

        if content.is_empty() {
            return Err(AppError::parse(format!(
                "article content could not be extracted: {}",
                result.url
            )));
        }

        let mut article =
            Article::new(result, content, CHANNEL, keyword).with_published_at(published_at);
        if !result.snippet.is_empty() {
            article = article.with_metadata("snippet", result.snippet.clone().into());
        }
        Ok(article)
    }

    fn search_wait_selector(&self) -> Option<&'static str> {
        Some(LIST_ITEM)
    }

    fn detail_wait_selector(&self) -> Option<&'static str> {
        Some(BODY)
    }
}

fn next_data(document: &Html) -> Option<Value> {
    let selector = parse_selector(NEXT_DATA).ok()?;
    let script = document.select(&selector).next()?;
    let raw: String = script.text().collect();

    serde_json::from_str(&raw)
        .inspect_err(|e| log::debug!("{CHANNEL}: unreadable page data: {e}"))
        .ok()
}

/// First non-empty string among `keys` of `value`.
fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(key)?.as_str())
        .find(|s| !s.is_empty())
}

fn search_results_from_next_data(data: &Value) -> Vec<SearchResult> {
    let props = &data["props"]["pageProps"];
    let Some(items) = [
        &props["searchResult"]["items"],
        &props["data"]["items"],
        &props["articles"],
    ]
    .into_iter()
    .filter_map(Value::as_array)
    .find(|items| !items.is_empty()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let title = clean_text(first_str(item, &["title"])?);
            let url = first_str(item, &["url", "link"])?;
            if title.is_empty() {
                return None;
            }
            let url = if url.starts_with('/') {
                absolute_url(BASE_URL, url)
            } else {
                url.to_string()
            };
            let snippet = first_str(item, &["description", "snippet"]).unwrap_or_default();
            Some(SearchResult::new(title, url).with_snippet(clean_text(snippet)))
        })
        .collect()
}

fn search_results_from_markup(document: &Html) -> Result<Vec<SearchResult>> {
    let item_selector = parse_selector(LIST_ITEM)?;
    let link_selector = parse_selector(LINK)?;
    let title_selector = parse_selector(TITLE)?;
    let mut seen = HashSet::new();

    let results = document
        .select(&item_selector)
        .filter_map(|item| {
            let link = item.select(&link_selector).next()?;
            let title = item.select(&title_selector).next()?;
            let href = link.value().attr("href").filter(|h| !h.is_empty())?;

            let url = absolute_url(BASE_URL, href);
            if !seen.insert(url.clone()) {
                return None;
            }
            let title = clean_text(&title.text().collect::<String>());
            if title.is_empty() {
                return None;
            }
            Some(SearchResult::new(title, url))
        })
        .collect();

    Ok(results)
}

/// `pageProps.article`, or `pageProps.data` when the former is absent or empty.
fn article_data(data: &Value) -> &Value {
    let props = &data["props"]["pageProps"];
    let article = &props["article"];
    if article.as_object().is_some_and(|o| !o.is_empty()) {
        article
    } else {
        &props["data"]
    }
}

fn content_from_next_data(data: &Value) -> String {
    let Some(content) = first_str(article_data(data), &["content", "body", "text"]) else {
        return String::new();
    };
    if content.contains('<') && content.contains('>') {
        let fragment = Html::parse_fragment(content);
        return element_text(&fragment.root_element());
    }
    clean_text(content)
}

fn date_from_next_data(data: &Value) -> Option<NaiveDateTime> {
    let text = first_str(
        article_data(data),
        &["publishedAt", "published_at", "datePublished", "inputDate"],
    )?;
    parse_datetime(text, DATE_FORMATS)
}

fn date_from_markup(document: &Html) -> Option<NaiveDateTime> {
    let selector = parse_selector(DATE).ok()?;
    let element = document.select(&selector).next()?;
    let value = element.value();
    let text = value
        .attr("content")
        .filter(|s| !s.is_empty())
        .or_else(|| value.attr("datetime").filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| element.text().collect());
    parse_datetime(&text, DATE_FORMATS)
}
