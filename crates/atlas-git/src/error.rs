//! Error types for atlas-git

use std::path::PathBuf;

/// Result type for atlas-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in atlas-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] atlas_fs::Error),

    #[error("Failed to spawn {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` timed out after {seconds}s")]
    Timeout { args: String, seconds: u64 },

    #[error("`git {args}` failed ({}): {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("exit {c}")))]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cloning needs at least one configured remote.
    #[error("No remote configured for {path}")]
    NoRemoteConfigured { path: PathBuf },

    /// Several remotes and none of them is `origin`.
    #[error("Cannot choose a remote to clone {path} from: {}", .remotes.join(", "))]
    AmbiguousRemote { path: PathBuf, remotes: Vec<String> },

    #[error("Mirrored remote '{remote}' needs an existing directory at {path}")]
    MirroredTargetMissing { path: PathBuf, remote: String },
}
