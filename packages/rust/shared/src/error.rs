//! Error types for docbuild.
//!
//! Library crates use [`DocBuildError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docbuild operations.
#[derive(Debug, thiserror::Error)]
pub enum DocBuildError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A notebook explicitly requested for conversion does not exist.
    #[error("no notebook with file path {}", path.display())]
    NotebookNotFound { path: PathBuf },

    /// The external notebook converter failed to run or exited unsuccessfully.
    #[error("converter error: {0}")]
    Converter(String),

    /// The module catalog could not be read or parsed.
    #[error("catalog error: {message}")]
    Catalog { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocBuildError>;

impl DocBuildError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a catalog error from any displayable message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
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

    /// Missing-input error for a notebook path.
    pub fn notebook_not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotebookNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocBuildError::config("unknown key");
        assert_eq!(err.to_string(), "config error: unknown key");

        let err = DocBuildError::notebook_not_found("docs/usersGuide_01.ipynb");
        assert_eq!(
            err.to_string(),
            "no notebook with file path docs/usersGuide_01.ipynb"
        );
    }

    #[test]
    fn io_error_keeps_path() {
        let err = DocBuildError::io(
            "/nope/index.rst",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/nope/index.rst"));
        assert!(matches!(err, DocBuildError::Io { .. }));
    }
}
