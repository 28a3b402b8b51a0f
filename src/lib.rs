// src/lib.rs

//! Korean news keyword crawler.
//!
//! Searches news outlets for keywords, fetching pages either over plain HTTP
//! or through a shared headless browser, and collects the matching articles
//! into a JSON report.

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outlets;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
