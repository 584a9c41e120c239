//! Error types for atlas-fs

use std::path::PathBuf;

/// Result type for atlas-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in atlas-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    /// The path is not located strictly below the workspace base.
    #[error("Invalid path: {path} is not inside {base}")]
    InvalidPath { path: PathBuf, base: PathBuf },

    /// The identifier cannot be decoded into a relative path.
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_identifier(identifier: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error concerns a single path rather than the filesystem.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Self::InvalidPath { .. } | Self::InvalidIdentifier { .. })
    }
}
