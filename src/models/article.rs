//! Search results, articles and per-task crawl results.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One entry of an outlet's search result page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }
}

/// A parsed article detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub content: String,
    pub published_at: Option<NaiveDateTime>,
    pub channel: String,
    pub keyword: String,
    pub crawled_at: DateTime<Local>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Article {
    /// Build an article stamped with the current time.
    pub fn new(
        search_result: &SearchResult,
        content: impl Into<String>,
        channel: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Self {
        Self {
            title: search_result.title.clone(),
            url: search_result.url.clone(),
            content: content.into(),
            published_at: None,
            channel: channel.into(),
            keyword: keyword.into(),
            crawled_at: Local::now(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_published_at(mut self, published_at: Option<NaiveDateTime>) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Aggregated outcome of crawling one outlet for one keyword.
///
/// `articles` and `errors` are append-only and keep discovery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlResult {
    pub channel: String,
    pub keyword: String,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CrawlResult {
    pub fn new(channel: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            keyword: keyword.into(),
            articles: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A result for a task that never produced one of its own.
    pub fn failed(
        channel: impl Into<String>,
        keyword: impl Into<String>,
        error: impl ToString,
    ) -> Self {
        let mut result = Self::new(channel, keyword);
        result.errors.push(error.to_string());
        result
    }

    pub fn push_article(&mut self, article: Article) {
        debug_assert_eq!(article.channel, self.channel);
        debug_assert_eq!(article.keyword, self.keyword);
        self.articles.push(article);
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
