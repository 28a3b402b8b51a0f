//! Local filesystem report storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::CrawlResult;
use crate::storage::{Report, ReportStorage};

/// Writes reports as pretty-printed JSON under one directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// File name for a report written at `crawled_at`.
    fn report_name(report: &Report) -> String {
        format!("crawl_{}.json", report.crawled_at.format("%Y%m%d_%H%M%S"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStorage for LocalStorage {
    async fn write_report(&self, results: &[CrawlResult]) -> Result<PathBuf> {
        let report = Report::new(results.to_vec());
        let path = self.root_dir.join(Self::report_name(&report));

        let bytes = serde_json::to_vec_pretty(&report)?;
        self.write_bytes(&path, &bytes).await?;

        log::info!(
            "Report saved: {} ({} articles, {} errors)",
            path.display(),
            report.total_articles,
            report.total_errors()
        );
        Ok(path)
    }

    async fn load_report(&self, path: &Path) -> Result<Report> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
