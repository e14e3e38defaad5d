//! Error types for SeoMapper.
//!
//! Library crates use [`SeoMapperError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Most pipeline steps never surface these errors to the caller: they log
//! them and substitute a sentinel string instead. The `try_*` entry points of
//! each crate return them so the orchestrator can record why a URL was skipped.

use std::path::PathBuf;

/// Top-level error type for all SeoMapper operations.
#[derive(Debug, thiserror::Error)]
pub enum SeoMapperError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// Chat-completion request or reply error.
    #[error("language model error: {0}")]
    Llm(String),

    /// Autocomplete search API error.
    #[error("autocomplete error: {0}")]
    Autocomplete(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Spreadsheet/JSON serialization error during export.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SeoMapperError>;

impl SeoMapperError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an HTTP status error, keeping at most 200 bytes of the body.
    pub fn http(url: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Http {
            url: url.into(),
            status,
            body: snippet(body, 200).to_string(),
        }
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a char.
pub fn snippet(text: &str, max: usize) -> &str {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SeoMapperError::config("failed to parse seomapper.toml");
        assert_eq!(err.to_string(), "config error: failed to parse seomapper.toml");

        let err = SeoMapperError::Llm("reply had no choices".into());
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn http_error_truncates_body() {
        let body = "x".repeat(500);
        let err = SeoMapperError::http("https://api.test/v1", 401, &body);
        match err {
            SeoMapperError::Http { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body.len(), 200);
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn snippet_keeps_short_text() {
        assert_eq!(snippet("short", 200), "short");
        assert_eq!(snippet("abcdef", 3), "abc");
    }

    #[test]
    fn http_error_truncation_respects_char_boundaries() {
        let body = "é".repeat(150);
        let err = SeoMapperError::http("https://api.test", 500, &body);
        assert!(err.to_string().starts_with("HTTP 500"));
    }
}
