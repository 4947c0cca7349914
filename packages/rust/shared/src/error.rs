//! Error types for docgen.
//!
//! Library crates use [`DocgenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docgen operations.
#[derive(Debug, thiserror::Error)]
pub enum DocgenError {
    /// A local relative import for which neither candidate file exists.
    #[error("cannot resolve import '{specifier}' from {}: no matching module file", base.display())]
    UnresolvedImport { base: PathBuf, specifier: String },

    /// A module that is already being processed was imported again.
    #[error("circular import detected at {}: {chain}", path.display())]
    CircularImport { path: PathBuf, chain: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The extraction engine failed on a source file.
    #[error("extraction failed for {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    /// Start/end token markers missing or out of order in the target document.
    #[error("token 'START TOKEN({token})' / 'END TOKEN({token})' not found in target document")]
    TokenNotFound { token: String },

    /// Markdown serialization error.
    #[error("markdown error: {0}")]
    Markdown(String),

    /// Debug artifact encoding error.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocgenError>;

impl DocgenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an extraction error for a given source file.
    pub fn extraction(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
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
