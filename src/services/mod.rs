//! Service layer for the crawler application.
//!
//! - Per-outlet crawling (`OutletCrawler`)

mod crawler;

pub use crawler::OutletCrawler;
