// src/config.rs

//! Settings loading.
//!
//! Settings come from an optional TOML file, then environment variables,
//! then command-line overrides applied by the binary.

use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Settings;

/// Environment variables recognised by [`apply_env_overrides`].
pub const ENV_MAX_PAGES: &str = "CRAWLER_MAX_PAGES";
pub const ENV_REQUEST_DELAY: &str = "CRAWLER_REQUEST_DELAY";
pub const ENV_REQUEST_TIMEOUT: &str = "CRAWLER_REQUEST_TIMEOUT";
pub const ENV_USER_AGENT: &str = "CRAWLER_USER_AGENT";
pub const ENV_OUTPUT_DIR: &str = "CRAWLER_OUTPUT_DIR";
pub const ENV_HEADLESS: &str = "BROWSER_HEADLESS";

/// Load settings from `path` (defaults if absent), apply process environment
/// overrides and validate the result.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let settings = apply_env_overrides(settings, |key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

/// Apply overrides looked up through `lookup`.
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_MAX_PAGES) {
        settings.crawler.max_pages = parse_var(ENV_MAX_PAGES, &value)?;
    }
    if let Some(value) = lookup(ENV_REQUEST_DELAY) {
        settings.crawler.request_delay_secs = parse_var(ENV_REQUEST_DELAY, &value)?;
    }
    if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
        settings.crawler.request_timeout_secs = parse_var(ENV_REQUEST_TIMEOUT, &value)?;
    }
    if let Some(value) = lookup(ENV_USER_AGENT) {
        settings.crawler.user_agent = value;
    }
    if let Some(value) = lookup(ENV_OUTPUT_DIR) {
        settings.output.output_dir = value;
    }
    if let Some(value) = lookup(ENV_HEADLESS) {
        settings.browser.headless = parse_bool(ENV_HEADLESS, &value)?;
    }
    Ok(settings)
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::validation(format!("{key}={value:?}: {e}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::validation(format!(
            "{key}={value:?}: expected a boolean"
        ))),
    }
}
