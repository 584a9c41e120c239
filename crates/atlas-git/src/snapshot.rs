//! Point-in-time repository state.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::RemoteSet;

/// A local branch and its divergence from its upstream.
///
/// Computed on every probe and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchState {
    pub name: String,
    /// Full upstream ref, e.g. `refs/remotes/origin/main`.
    pub upstream: Option<String>,
    pub ahead: u32,
    pub behind: u32,
}

impl BranchState {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upstream: None,
            ahead: 0,
            behind: 0,
        }
    }

    pub fn tracking(name: impl Into<String>, upstream: impl Into<String>, ahead: u32, behind: u32) -> Self {
        Self {
            name: name.into(),
            upstream: Some(upstream.into()),
            ahead,
            behind,
        }
    }

    pub fn is_local_only(&self) -> bool {
        self.upstream.is_none()
    }
}

/// Everything the status classification looks at, gathered in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeSnapshot {
    pub path: PathBuf,
    pub is_repo: bool,
    pub dirty: bool,
    pub ignored_dirt: bool,
    pub stashes: Vec<String>,
    pub remotes: RemoteSet,
    /// Ordered by branch name.
    pub branches: Vec<BranchState>,
    pub probed_at: DateTime<Utc>,
}

impl ProbeSnapshot {
    /// Snapshot of a directory git does not recognize.
    pub fn not_a_repo(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_repo: false,
            dirty: false,
            ignored_dirt: false,
            stashes: Vec::new(),
            remotes: RemoteSet::new(),
            branches: Vec::new(),
            probed_at: Utc::now(),
        }
    }
}
