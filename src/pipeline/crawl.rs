// src/pipeline/crawl.rs

//! Crawl-and-save pipeline.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::Result;
use crate::pipeline::CrawlOrchestrator;
use crate::storage::ReportStorage;

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub report_path: PathBuf,
    pub total_channels: usize,
    pub total_articles: usize,
    pub total_errors: usize,
}

/// Crawl `keywords` on `outlets` and write the report to `storage`.
pub async fn run_crawler(
    orchestrator: &CrawlOrchestrator,
    storage: &dyn ReportStorage,
    keywords: &[String],
    outlets: Option<&[String]>,
) -> Result<CrawlSummary> {
    let started = Instant::now();
    log::info!("Starting crawl for keywords: {}", keywords.join(", "));

    let results = orchestrator.run(keywords, outlets).await?;
    let report_path = storage.write_report(&results).await?;

    let summary = CrawlSummary {
        report_path,
        total_channels: results
            .iter()
            .map(|r| r.channel.as_str())
            .collect::<HashSet<_>>()
            .len(),
        total_articles: results.iter().map(|r| r.articles.len()).sum(),
        total_errors: results.iter().map(|r| r.errors.len()).sum(),
    };

    log::info!(
        "Crawl pipeline complete in {:.1}s",
        started.elapsed().as_secs_f64()
    );
    Ok(summary)
}
