// src/pipeline/retry.rs

//! Exponential backoff around fallible async operations.
//!
//! The operation is attempted at most `max_retries + 1` times. Before retry
//! `n` (0-based) the policy sleeps `base_delay * backoff_factor^n`. Errors
//! whose kind is not retryable are returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, ErrorKind, Result};
use crate::models::RetrySettings;

/// Retry configuration applied to every page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    backoff_factor: f64,
    retry_on: Vec<ErrorKind>,
}

impl RetryPolicy {
    /// Policy retrying fetch failures only.
    pub fn new(max_retries: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff_factor,
            retry_on: vec![ErrorKind::Fetch],
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_retries,
            Duration::try_from_secs_f64(settings.base_delay_secs).unwrap_or_default(),
            settings.backoff_factor,
        )
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, 1.0)
    }

    /// Replace the set of retryable error kinds.
    pub fn retry_on(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retry_on = kinds.into_iter().collect();
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sleep before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    fn is_retryable(&self, error: &AppError) -> bool {
        self.retry_on.contains(&error.kind())
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error or
    /// runs out of attempts. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && self.is_retryable(&e) => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "Retry {}/{} in {:.1}s: {e}",
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}
