// src/fetch/mod.rs

//! Page retrieval.
//!
//! Every outlet fetches through a [`FetchStrategy`]: either a plain HTTP GET
//! ([`DirectFetch`]) or a page rendered inside a shared headless browser
//! ([`RenderedFetch`]).

pub mod browser;
mod direct;
mod rendered;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use browser::{BrowserClient, BrowserLauncher, ChromiumLauncher};
pub use direct::DirectFetch;
pub use rendered::{PageRenderer, RenderedFetch};

/// Which fetch variant an outlet needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    /// Plain HTTP GET
    Static,
    /// Rendered in the shared browser session
    Dynamic,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Retrieves the HTML of a page.
///
/// `wait_for` is a CSS selector that must be present before the markup is
/// captured. Variants that cannot wait ignore it.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    async fn fetch(&self, url: &str, wait_for: Option<&str>) -> Result<String>;

    fn kind(&self) -> FetchKind;
}
