// src/fetch/direct.rs

use async_trait::async_trait;

use super::{FetchKind, FetchStrategy};
use crate::error::{AppError, Result};

/// Plain HTTP GET through the run's shared client.
///
/// Redirects are followed by the client. Any non-2xx final status is a fetch
/// error.
#[derive(Debug, Clone)]
pub struct DirectFetch {
    client: reqwest::Client,
}

impl DirectFetch {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchStrategy for DirectFetch {
    async fn fetch(&self, url: &str, _wait_for: Option<&str>) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(url, e))?;

        response.text().await.map_err(|e| AppError::fetch(url, e))
    }

    fn kind(&self) -> FetchKind {
        FetchKind::Static
    }
}
