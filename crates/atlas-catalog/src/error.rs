//! Error types for atlas-catalog

use std::path::PathBuf;

/// Result type for atlas-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in atlas-catalog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] atlas_fs::Error),

    /// The index file exists but is not valid UTF-8 Turtle.
    #[error("Malformed catalog {path} at line {line}: {message}")]
    CatalogParse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
