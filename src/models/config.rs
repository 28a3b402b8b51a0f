//! Crawler settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root settings, read-only for the duration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Paging, pacing and HTTP behaviour
    #[serde(default)]
    pub crawler: CrawlerSettings,

    /// Backoff applied to every fetch
    #[serde(default)]
    pub retry: RetrySettings,

    /// Rendered-fetch browser session
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Report location
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Settings load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate settings values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if self.crawler.request_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.request_timeout_secs must be > 0",
            ));
        }
        if !is_valid_secs(self.crawler.request_delay_secs) {
            return Err(AppError::validation(
                "crawler.request_delay_secs must be a finite value >= 0",
            ));
        }
        if !is_valid_secs(self.retry.base_delay_secs) {
            return Err(AppError::validation(
                "retry.base_delay_secs must be a finite value >= 0",
            ));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(AppError::validation("retry.backoff_factor must be >= 1"));
        }
        if self.output.output_dir.trim().is_empty() {
            return Err(AppError::validation("output.output_dir is empty"));
        }
        Ok(())
    }
}

fn is_valid_secs(secs: f64) -> bool {
    secs.is_finite() && secs >= 0.0
}

/// HTTP and crawling behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlerSettings {
    /// Search pages to visit per keyword
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Pause before each detail fetch and after each search page, in seconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_secs: f64,

    /// Per-fetch timeout in seconds
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header for direct requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl CrawlerSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_secs).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            request_delay_secs: defaults::request_delay(),
            request_timeout_secs: defaults::request_timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Exponential backoff parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrySettings {
    /// Extra attempts after the first one
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "defaults::base_delay")]
    pub base_delay_secs: f64,

    /// Multiplier applied per attempt
    #[serde(default = "defaults::backoff_factor")]
    pub backoff_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: defaults::max_retries(),
            base_delay_secs: defaults::base_delay(),
            backoff_factor: defaults::backoff_factor(),
        }
    }
}

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowserSettings {
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Wait applied after navigation when no wait selector is given
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,
}

impl BrowserSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: defaults::headless(),
            settle_delay_ms: defaults::settle_delay(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    pub fn max_pages() -> u32 {
        3
    }
    pub fn request_delay() -> f64 {
        1.0
    }
    pub fn request_timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
         AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0.0.0 Safari/537.36"
            .into()
    }

    pub fn max_retries() -> u32 {
        2
    }
    pub fn base_delay() -> f64 {
        1.0
    }
    pub fn backoff_factor() -> f64 {
        2.0
    }

    pub fn headless() -> bool {
        true
    }
    pub fn settle_delay() -> u64 {
        2000
    }

    pub fn output_dir() -> String {
        "./output".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.crawler.max_pages, 3);
        assert_eq!(settings.crawler.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.crawler.request_delay(), Duration::from_secs(1));
        assert!(settings.browser.headless);
        assert_eq!(settings.output.output_dir, "./output");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [crawler]
            max_pages = 1
            request_delay_secs = 0.25

            [browser]
            headless = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.crawler.max_pages, 1);
        assert_eq!(settings.crawler.request_delay(), Duration::from_millis(250));
        assert_eq!(settings.crawler.request_timeout_secs, 30);
        assert!(!settings.browser.headless);
        assert_eq!(settings.browser.settle_delay_ms, 2000);
        assert_eq!(settings.retry.max_retries, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.crawler.max_pages = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.crawler.user_agent = "  ".into();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.crawler.request_delay_secs = -1.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.retry.backoff_factor = 0.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = Settings::load_or_default("/nonexistent/settings.toml");
        assert_eq!(settings, Settings::default());
    }
}
