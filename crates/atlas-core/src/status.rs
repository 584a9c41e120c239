//! Classification of repository state.
//!
//! [`classify`] is pure: the same [`ProbeSnapshot`] always yields the same
//! [`StatusRecord`].

use std::collections::BTreeSet;
use std::path::PathBuf;

use atlas_git::{BranchState, ProbeSnapshot};
use serde::Serialize;

/// A repository-wide condition worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoFlag {
    /// Git does not recognize the directory; no other flag is evaluated.
    NotARepo,
    Dirty,
    IgnoredDirt,
    Stashed,
    NoRemote,
    /// Remotes exist but some branch tracks none of them.
    LocalBranches,
}

impl RepoFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotARepo => "not a repo",
            Self::Dirty => "dirty",
            Self::IgnoredDirt => "ignored dirt",
            Self::Stashed => "stashed",
            Self::NoRemote => "no remote",
            Self::LocalBranches => "local branches",
        }
    }
}

impl std::fmt::Display for RepoFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one branch relates to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BranchFlag {
    InSync,
    Diverged { behind: u32, ahead: u32 },
    /// No upstream configured.
    Untracked,
}

impl BranchFlag {
    fn of(branch: &BranchState) -> Self {
        if branch.is_local_only() {
            Self::Untracked
        } else if branch.ahead > 0 || branch.behind > 0 {
            Self::Diverged {
                behind: branch.behind,
                ahead: branch.ahead,
            }
        } else {
            Self::InSync
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchStatus {
    pub name: String,
    pub upstream: Option<String>,
    pub flag: BranchFlag,
}

/// Classified state of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub path: PathBuf,
    pub flags: BTreeSet<RepoFlag>,
    /// Ordered by branch name.
    pub branches: Vec<BranchStatus>,
}

impl StatusRecord {
    pub fn has(&self, flag: RepoFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_repo(&self) -> bool {
        !self.has(RepoFlag::NotARepo)
    }

    /// Some repository flag fired or some branch is not in sync.
    pub fn attention_needed(&self) -> bool {
        !self.flags.is_empty()
            || self
                .branches
                .iter()
                .any(|branch| branch.flag != BranchFlag::InSync)
    }
}

/// Turn a snapshot into flags.
pub fn classify(snapshot: &ProbeSnapshot) -> StatusRecord {
    let mut flags = BTreeSet::new();

    if !snapshot.is_repo {
        flags.insert(RepoFlag::NotARepo);
        return StatusRecord {
            path: snapshot.path.clone(),
            flags,
            branches: Vec::new(),
        };
    }

    if snapshot.dirty {
        flags.insert(RepoFlag::Dirty);
    }
    if snapshot.ignored_dirt {
        flags.insert(RepoFlag::IgnoredDirt);
    }
    if !snapshot.stashes.is_empty() {
        flags.insert(RepoFlag::Stashed);
    }
    if snapshot.remotes.is_empty() {
        flags.insert(RepoFlag::NoRemote);
    } else if snapshot.branches.iter().any(BranchState::is_local_only) {
        flags.insert(RepoFlag::LocalBranches);
    }

    let mut branches: Vec<BranchStatus> = snapshot
        .branches
        .iter()
        .map(|branch| BranchStatus {
            name: branch.name.clone(),
            upstream: branch.upstream.clone(),
            flag: BranchFlag::of(branch),
        })
        .collect();
    branches.sort_by(|a, b| a.name.cmp(&b.name));

    StatusRecord {
        path: snapshot.path.clone(),
        flags,
        branches,
    }
}
