// src/models/mod.rs

//! Domain models for the crawler.

mod article;
mod config;

pub use article::{Article, CrawlResult, SearchResult};
pub use config::{BrowserSettings, CrawlerSettings, OutputSettings, RetrySettings, Settings};
