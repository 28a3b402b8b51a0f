// src/utils/http.rs

//! HTTP client utilities.

use reqwest::redirect::Policy;

use crate::error::{AppError, Result};
use crate::models::CrawlerSettings;

/// Maximum redirect hops followed by the shared client.
const MAX_REDIRECTS: usize = 10;

/// Create the shared, connection-pooled asynchronous HTTP client.
pub fn create_async_client(settings: &CrawlerSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(settings.request_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| AppError::configuration(format!("HTTP client: {e}")))?;
    Ok(client)
}
