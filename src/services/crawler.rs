// src/services/crawler.rs

//! Per-outlet crawl loop.
//!
//! For each search page in order: fetch it, parse the result entries, then
//! fetch and parse every entry's article page. A failed page or article is
//! recorded as text in the [`CrawlResult`] and the loop moves on.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fetch::{FetchKind, FetchStrategy};
use crate::models::{Article, CrawlResult, CrawlerSettings, SearchResult};
use crate::outlets::OutletAdapter;
use crate::pipeline::RetryPolicy;

/// An outlet adapter bound to the fetch strategy it requires.
pub struct OutletCrawler {
    adapter: Box<dyn OutletAdapter>,
    fetcher: Arc<dyn FetchStrategy>,
    settings: CrawlerSettings,
    retry: RetryPolicy,
}

impl OutletCrawler {
    pub fn new(
        adapter: Box<dyn OutletAdapter>,
        fetcher: Arc<dyn FetchStrategy>,
        settings: CrawlerSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            adapter,
            fetcher,
            settings,
            retry,
        }
    }

    pub fn channel_name(&self) -> &'static str {
        self.adapter.channel_name()
    }

    pub fn fetch_kind(&self) -> FetchKind {
        self.fetcher.kind()
    }

    /// Crawl up to `max_pages` search pages for `keyword`.
    pub async fn crawl(&self, keyword: &str) -> CrawlResult {
        let channel = self.channel_name();
        let delay = self.settings.request_delay();
        let mut result = CrawlResult::new(channel, keyword);
        log::info!("[{channel}] crawling '{keyword}' ({} pages)", self.settings.max_pages);

        for page in 1..=self.settings.max_pages {
            let url = self.adapter.build_search_url(keyword, page);
            log::info!("[{channel}] search page {page}: {url}");

            let entries = match self.search_page(&url).await {
                Ok(entries) => entries,
                Err(e) => {
                    let message = format!("page {page} search failed: {e}");
                    log::warn!("[{channel}] {message}");
                    result.push_error(message);
                    continue;
                }
            };
            log::debug!("[{channel}] page {page}: {} entries", entries.len());

            for entry in &entries {
                tokio::time::sleep(delay).await;

                match self.article(entry, keyword).await {
                    Ok(article) => {
                        log::debug!("[{channel}] collected: {}", entry.title);
                        result.push_article(article);
                    }
                    Err(e) => {
                        let message = format!("article fetch failed ({}): {e}", entry.url);
                        log::warn!("[{channel}] {message}");
                        result.push_error(message);
                    }
                }
            }

            tokio::time::sleep(delay).await;
        }

        log::info!(
            "[{channel}] '{keyword}' done: {} articles, {} errors",
            result.articles.len(),
            result.errors.len()
        );
        result
    }

    async fn search_page(&self, url: &str) -> Result<Vec<SearchResult>> {
        let html = self.fetch(url, self.adapter.search_wait_selector()).await?;
        self.adapter.parse_search_results(&html)
    }

    async fn article(&self, entry: &SearchResult, keyword: &str) -> Result<Article> {
        let html = self
            .fetch(&entry.url, self.adapter.detail_wait_selector())
            .await?;
        self.adapter.parse_article(&html, entry, keyword)
    }

    async fn fetch(&self, url: &str, wait_for: Option<&str>) -> Result<String> {
        self.retry
            .run(move || self.fetcher.fetch(url, wait_for))
            .await
    }
}

impl fmt::Debug for OutletCrawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutletCrawler")
            .field("channel", &self.channel_name())
            .field("kind", &self.fetch_kind())
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
