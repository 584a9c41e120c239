//! Live state of one working directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::OnceCell;

use crate::remote::parse_remote_verbose;
use crate::{BranchState, CloneOutcome, Error, GitRunner, ProbeSnapshot, Remote, RemoteSet, Result};

const BRANCH_FORMAT: &str = "--format=%(refname:short)%09%(upstream)";

/// Queries and mutates a single working directory through the git CLI.
///
/// Remote configuration is read once and cached for the lifetime of the
/// probe. [`GitProbe::set_remotes`] overrides that cache, which is how a
/// repository that does not exist yet learns the remotes it should be cloned
/// from.
#[derive(Debug)]
pub struct GitProbe {
    path: PathBuf,
    base: Option<PathBuf>,
    runner: GitRunner,
    remotes: OnceCell<RemoteSet>,
}

impl GitProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base: None,
            runner: GitRunner::default(),
            remotes: OnceCell::new(),
        }
    }

    /// Base directory used only to shorten [`Display`](std::fmt::Display) output.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_runner(mut self, runner: GitRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether git considers this directory the top level of a work tree.
    ///
    /// A subdirectory of some other repository is not a repository itself.
    pub async fn is_repo(&self) -> bool {
        let Some(output) = self
            .runner
            .query(&self.path, &["rev-parse", "--show-toplevel"])
            .await
        else {
            return false;
        };
        let toplevel = PathBuf::from(output.stdout.trim());
        match (dunce::canonicalize(&toplevel), dunce::canonicalize(&self.path)) {
            (Ok(top), Ok(own)) => top == own,
            _ => false,
        }
    }

    /// Configured remotes, read once from `git remote -v`.
    pub async fn remotes(&self) -> &RemoteSet {
        self.remotes
            .get_or_init(|| async {
                match self.runner.query(&self.path, &["remote", "-v"]).await {
                    Some(output) => parse_remote_verbose(&output.stdout),
                    None => RemoteSet::new(),
                }
            })
            .await
    }

    /// Replace the cached remotes. The repository itself is not touched.
    pub fn set_remotes(&mut self, remotes: RemoteSet) {
        self.remotes = OnceCell::new_with(Some(remotes));
    }

    /// Local branches mapped to their full upstream ref, if any.
    pub async fn branches(&self) -> BTreeMap<String, Option<String>> {
        let Some(output) = self
            .runner
            .query(&self.path, &["for-each-ref", BRANCH_FORMAT, "refs/heads"])
            .await
        else {
            return BTreeMap::new();
        };
        output
            .lines()
            .map(|line| match line.split_once('\t') {
                Some((name, upstream)) => {
                    let upstream = upstream.trim();
                    (
                        name.to_string(),
                        (!upstream.is_empty()).then(|| upstream.to_string()),
                    )
                }
                None => (line.trim().to_string(), None),
            })
            .collect()
    }

    /// Entries of `git stash list`.
    pub async fn stashes(&self) -> Vec<String> {
        match self.runner.query(&self.path, &["stash", "list"]).await {
            Some(output) => output.lines().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    /// Uncommitted or untracked changes exist.
    pub async fn dirty(&self) -> bool {
        self.runner
            .query(&self.path, &["status", "--porcelain"])
            .await
            .is_some_and(|output| output.lines().next().is_some())
    }

    /// Ignored files exist in the work tree.
    pub async fn ignored_dirt(&self) -> bool {
        self.runner
            .query(&self.path, &["status", "--porcelain", "--ignored"])
            .await
            .is_some_and(|output| output.lines().any(|line| line.starts_with("!!")))
    }

    /// Branches without an upstream.
    pub async fn local_branches(&self) -> Vec<String> {
        self.branches()
            .await
            .into_iter()
            .filter_map(|(name, upstream)| upstream.is_none().then_some(name))
            .collect()
    }

    /// Commits on `branch` missing from its upstream.
    pub async fn ahead(&self, branch: &str) -> u32 {
        self.ahead_behind(branch).await.0
    }

    /// Commits on the upstream of `branch` missing from `branch`.
    pub async fn behind(&self, branch: &str) -> u32 {
        self.ahead_behind(branch).await.1
    }

    /// `(ahead, behind)` of `branch` against its upstream, `(0, 0)` when the
    /// branch has none or the counts cannot be computed.
    pub async fn ahead_behind(&self, branch: &str) -> (u32, u32) {
        match self.branches().await.get(branch) {
            Some(Some(upstream)) => self.count_divergence(branch, upstream).await,
            _ => (0, 0),
        }
    }

    async fn count_divergence(&self, branch: &str, upstream: &str) -> (u32, u32) {
        let range = format!("{branch}...{upstream}");
        let Some(output) = self
            .runner
            .query(&self.path, &["rev-list", "--left-right", "--count", &range])
            .await
        else {
            return (0, 0);
        };
        let mut counts = output
            .stdout
            .split_whitespace()
            .map(|n| n.parse::<u32>().unwrap_or(0));
        let ahead = counts.next().unwrap_or(0);
        let behind = counts.next().unwrap_or(0);
        (ahead, behind)
    }

    /// `git fetch --all`.
    pub async fn fetch_all(&self) -> Result<()> {
        self.runner.run(&self.path, &["fetch", "--all", "--quiet"]).await?;
        Ok(())
    }

    /// Materialize the repository from its configured remotes.
    ///
    /// `origin` is preferred; otherwise exactly one remote must be configured.
    pub async fn clone(&self) -> Result<CloneOutcome> {
        let (name, remote) = self.clone_source().await?;

        if remote.is_mirrored() {
            if !self.path.is_dir() {
                return Err(Error::MirroredTargetMissing {
                    path: self.path.clone(),
                    remote: name,
                });
            }
            tracing::info!(repo = %self, remote = %name, "Skipping clone from mirrored remote");
            return Ok(CloneOutcome::SkippedMirrored { remote: name });
        }

        if self.path.is_dir() && self.is_repo().await {
            tracing::debug!(repo = %self, "Already a repository, not cloning");
            return Ok(CloneOutcome::AlreadyPresent);
        }

        tokio::fs::create_dir_all(&self.path)
            .await
            .map_err(|source| Error::Io {
                path: self.path.clone(),
                source,
            })?;
        self.runner
            .run(&self.path, &["clone", "--quiet", &remote.fetch, "."])
            .await?;
        tracing::info!(repo = %self, remote = %name, url = %remote.fetch, "Cloned");
        Ok(CloneOutcome::Cloned { remote: name })
    }

    async fn clone_source(&self) -> Result<(String, Remote)> {
        let remotes = self.remotes().await;
        if let Some(origin) = remotes.get("origin") {
            return Ok(("origin".to_string(), origin.clone()));
        }
        let mut iter = remotes.iter();
        match (iter.next(), iter.next()) {
            (None, _) => Err(Error::NoRemoteConfigured {
                path: self.path.clone(),
            }),
            (Some((name, remote)), None) => Ok((name.clone(), remote.clone())),
            (Some(_), Some(_)) => Err(Error::AmbiguousRemote {
                path: self.path.clone(),
                remotes: remotes.keys().cloned().collect(),
            }),
        }
    }

    /// Register every configured remote missing from the live repository.
    ///
    /// A mirrored remote `name` is registered as `name-fetch` and
    /// `name-push`. Returns the names that were added.
    pub async fn setup(&self) -> Result<Vec<String>> {
        let live: BTreeSet<String> = self
            .runner
            .run(&self.path, &["remote"])
            .await?
            .lines()
            .map(|line| line.trim().to_string())
            .collect();

        let mut added = Vec::new();
        for (name, url) in registrations(self.remotes().await) {
            if live.contains(&name) {
                continue;
            }
            self.runner
                .run(&self.path, &["remote", "add", &name, &url])
                .await?;
            tracing::debug!(repo = %self, remote = %name, url = %url, "Added remote");
            added.push(name);
        }
        Ok(added)
    }

    /// Gather every status signal in one pass.
    pub async fn snapshot(&self) -> ProbeSnapshot {
        if !self.is_repo().await {
            tracing::debug!(repo = %self, "Not a repository");
            return ProbeSnapshot::not_a_repo(&self.path);
        }

        let mut branches = Vec::new();
        for (name, upstream) in self.branches().await {
            let state = match upstream {
                Some(upstream) => {
                    let (ahead, behind) = self.count_divergence(&name, &upstream).await;
                    BranchState::tracking(name, upstream, ahead, behind)
                }
                None => BranchState::local(name),
            };
            branches.push(state);
        }

        ProbeSnapshot {
            path: self.path.clone(),
            is_repo: true,
            dirty: self.dirty().await,
            ignored_dirt: self.ignored_dirt().await,
            stashes: self.stashes().await,
            remotes: self.remotes().await.clone(),
            branches,
            probed_at: Utc::now(),
        }
    }
}

/// Remote names and URLs to register for a remote set.
fn registrations(remotes: &RemoteSet) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (name, remote) in remotes {
        if remote.is_mirrored() {
            out.push((format!("{name}-fetch"), remote.fetch.clone()));
            out.push((format!("{name}-push"), remote.push.clone()));
        } else {
            out.push((name.clone(), remote.fetch.clone()));
        }
    }
    out
}

impl std::fmt::Display for GitProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = self
            .base
            .as_deref()
            .and_then(|base| self.path.strip_prefix(base).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or(self.path.as_path());
        write!(f, "{}", shown.display())
    }
}
