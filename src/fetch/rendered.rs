// src/fetch/rendered.rs

use std::sync::Arc;

use async_trait::async_trait;

use super::{FetchKind, FetchStrategy};
use crate::error::{AppError, BoxError, Result};

/// A browser session able to render pages.
///
/// One session is shared by every dynamic outlet of a run; implementations
/// must allow concurrent `render` calls.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url` in a fresh tab and return the rendered markup.
    ///
    /// Waits for `wait_for` when given, otherwise for a fixed settle delay.
    async fn render(
        &self,
        url: &str,
        wait_for: Option<&str>,
    ) -> std::result::Result<String, BoxError>;

    /// Close the session. Calling it again is a no-op.
    async fn shutdown(&self) -> Result<()>;
}

/// Fetches pages through the shared [`PageRenderer`].
#[derive(Clone)]
pub struct RenderedFetch {
    renderer: Arc<dyn PageRenderer>,
}

impl RenderedFetch {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl FetchStrategy for RenderedFetch {
    async fn fetch(&self, url: &str, wait_for: Option<&str>) -> Result<String> {
        self.renderer
            .render(url, wait_for)
            .await
            .map_err(|e| AppError::fetch(url, e))
    }

    fn kind(&self) -> FetchKind {
        FetchKind::Dynamic
    }
}
