//! Error types for atlas-core

use std::path::PathBuf;

/// Result type for atlas-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole workflow.
///
/// Failures that concern a single repository are reported in the workflow's
/// report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No catalog file in the start directory or any of its ancestors
    #[error("No {name} found in {start} or any parent directory")]
    IndexNotFound { start: PathBuf, name: String },

    #[error("Root directory {path} does not exist or is not a directory")]
    InvalidRoot { path: PathBuf },

    /// The requested repository has no record in the catalog
    #[error("{path} is not in the catalog")]
    NotCataloged { path: PathBuf },

    /// The operation was interrupted; nothing was written.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] atlas_fs::Error),

    #[error(transparent)]
    Git(#[from] atlas_git::Error),

    #[error(transparent)]
    Catalog(#[from] atlas_catalog::Error),
}
