// src/error.rs

//! Unified error handling for the crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Boxed underlying cause carried by fetch failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport or rendering failure while reaching a page
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Expected content missing from a fetched page
    #[error("parse error: {0}")]
    Parse(String),

    /// Unknown outlet or missing browser session
    #[error("configuration error: {0}")]
    Configuration(String),

    /// CSS selector parsing failed
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Settings validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Browser session could not be launched or closed
    #[error("browser error: {0}")]
    Browser(String),

    /// A crawl task ended abnormally
    #[error("task failed: {0}")]
    Task(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of [`AppError`], used to decide retryability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Configuration,
    Selector,
    Validation,
    Browser,
    Task,
    Io,
    Json,
    Toml,
}

impl AppError {
    /// Create a fetch error for `url` wrapping its underlying cause.
    pub fn fetch(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Selector { .. } => ErrorKind::Selector,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Browser(_) => ErrorKind::Browser,
            Self::Task(_) => ErrorKind::Task,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
            Self::Toml(_) => ErrorKind::Toml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_keeps_cause() {
        let err = AppError::fetch("https://example.com/a", "connection reset");
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/a: connection reset"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AppError::parse("x").kind(), ErrorKind::Parse);
        assert_eq!(
            AppError::configuration("x").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(AppError::selector("[[", "bad").kind(), ErrorKind::Selector);
    }

    #[test]
    fn test_configuration_display() {
        let err = AppError::configuration("unknown outlet 'cnn'");
        assert_eq!(err.to_string(), "configuration error: unknown outlet 'cnn'");
    }
}
