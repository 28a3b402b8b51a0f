//! Crawl report persistence.
//!
//! A run produces one JSON document:
//!
//! ```text
//! {output_dir}/
//! └── crawl_20260216_180233.json
//! ```

pub mod local;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::CrawlResult;

pub use local::LocalStorage;

/// The persisted outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub crawled_at: DateTime<Local>,
    /// Distinct channels among `results`
    pub total_channels: usize,
    pub total_articles: usize,
    pub results: Vec<CrawlResult>,
}

impl Report {
    pub fn new(results: Vec<CrawlResult>) -> Self {
        let total_channels = results
            .iter()
            .map(|r| r.channel.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_articles = results.iter().map(|r| r.articles.len()).sum();

        Self {
            crawled_at: Local::now(),
            total_channels,
            total_articles,
            results,
        }
    }

    pub fn total_errors(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }
}

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Persist `results` as a new report and return where it was written.
    async fn write_report(&self, results: &[CrawlResult]) -> Result<PathBuf>;

    /// Read back a report written by [`ReportStorage::write_report`].
    async fn load_report(&self, path: &Path) -> Result<Report>;
}
