//! Error types for shelfpage.
//!
//! Library crates use [`ShelfpageError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all shelfpage operations.
#[derive(Debug, thiserror::Error)]
pub enum ShelfpageError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching the sheet export.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty dataset, malformed sheet, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShelfpageError>;

impl ShelfpageError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_displays_its_message() {
        let err = ShelfpageError::config("missing sheet URL");
        assert_eq!(err.to_string(), "config error: missing sheet URL");

        let err = ShelfpageError::validation("sheet contains no rows");
        assert!(err.to_string().contains("no rows"));

        let err = ShelfpageError::Network("HTTP 500".into());
        assert_eq!(err.to_string(), "network error: HTTP 500");

        let err = ShelfpageError::io(
            "/tmp/shelf.html",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("shelf.html"));
    }
}
