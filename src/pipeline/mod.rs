//! Pipeline entry points for crawler operations.
//!
//! - `RetryPolicy`: Exponential backoff around page fetches
//! - `OutletRegistry`: Outlet ids to adapters and fetch variants
//! - `CrawlOrchestrator`: Concurrent crawl of every (outlet, keyword) pair
//! - `run_crawler`: Crawl and write the report

pub mod crawl;
pub mod orchestrator;
pub mod registry;
pub mod retry;

pub use crawl::{CrawlSummary, run_crawler};
pub use orchestrator::CrawlOrchestrator;
pub use registry::{OutletDescriptor, OutletRegistry};
pub use retry::RetryPolicy;
