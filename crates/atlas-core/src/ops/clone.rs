//! `clone`: materialize cataloged repositories.

use std::collections::BTreeMap;
use std::path::PathBuf;

use atlas_catalog::{Catalog, Handle};
use atlas_fs::{NormalizedPath, RobustnessConfig, identifier, io};
use atlas_git::{CloneOutcome, GitProbe, RemoteSet, RepoLifecycle};
use serde::Serialize;

use super::Atlas;
use crate::workspace::Workspace;
use crate::{Error, Result};

/// Which repositories [`Atlas::clone`] materializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneSelection {
    All,
    /// One repository, by absolute path.
    One(PathBuf),
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClonedRepository {
    pub relative: NormalizedPath,
    pub path: PathBuf,
    pub outcome: Option<CloneOutcome>,
    /// Remotes registered by setup.
    pub added_remotes: Vec<String>,
    pub lifecycle: RepoLifecycle,
}

impl ClonedRepository {
    pub fn is_failed(&self) -> bool {
        self.lifecycle.is_failed()
    }
}

/// Outcome of [`Atlas::clone`].
#[derive(Debug, Clone, Serialize)]
pub struct CloneReport {
    /// Catalog that was read, inside the root.
    pub index: PathBuf,
    /// Whether the catalog was copied into the root first.
    pub index_copied: bool,
    /// Sorted by relative path.
    pub repositories: Vec<ClonedRepository>,
}

impl CloneReport {
    pub fn failures(&self) -> impl Iterator<Item = &ClonedRepository> {
        self.repositories.iter().filter(|repo| repo.is_failed())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl Atlas {
    /// Clone the selected repositories from their recorded remotes and
    /// register their other remotes.
    ///
    /// A catalog outside the root is first copied into it. Repositories are
    /// handled shallowest first so that a nested repository is cloned into
    /// its parent's working copy, not the other way round. A failing
    /// repository is reported and does not stop the others.
    pub async fn clone(&self, workspace: &Workspace, selection: CloneSelection) -> Result<CloneReport> {
        workspace.require_index()?;
        if !workspace.root.is_dir() {
            return Err(Error::InvalidRoot {
                path: workspace.root.clone(),
            });
        }

        let (index, index_copied) = self.adopt_index(workspace)?;
        let catalog = Catalog::open(&index, &workspace.root)?;

        let handles = match selection {
            CloneSelection::All => catalog.list_handles(),
            CloneSelection::One(path) => {
                let found = identifier::relative_path(&workspace.root, &path)
                    .ok()
                    .and_then(|relative| catalog.find(relative.to_native()));
                match found {
                    Some(handle) => vec![handle],
                    None => return Err(Error::NotCataloged { path }),
                }
            }
        };

        let mut waves: BTreeMap<usize, Vec<(Handle, RemoteSet)>> = BTreeMap::new();
        for handle in handles {
            let remotes = catalog.remotes_for(&handle);
            waves
                .entry(handle.relative.components().count())
                .or_default()
                .push((handle, remotes));
        }

        let pool = self.pool();
        let mut repositories = Vec::new();
        for (depth, wave) in waves {
            tracing::debug!(depth, repositories = wave.len(), "Cloning wave");
            let prober = self.prober(workspace);
            let done = pool
                .run(wave, move |(handle, remotes)| {
                    let mut probe = prober.probe(&handle.path);
                    probe.set_remotes(remotes);
                    async move { materialize(probe, handle).await }
                })
                .await?;
            repositories.extend(done);
        }
        repositories.sort_by(|a, b| a.relative.cmp(&b.relative));

        let failed = repositories.iter().filter(|repo| repo.is_failed()).count();
        tracing::info!(
            repositories = repositories.len(),
            failed,
            "Clone finished"
        );
        Ok(CloneReport {
            index,
            index_copied,
            repositories,
        })
    }

    /// The catalog inside the root, copying it there when it lives elsewhere.
    fn adopt_index(&self, workspace: &Workspace) -> Result<(PathBuf, bool)> {
        if workspace.index_in_root() {
            return Ok((workspace.index.clone(), false));
        }
        let target = workspace.root.join(&self.config.scan.index_name);
        let content = io::read_bytes(&NormalizedPath::new(&workspace.index))?;
        io::write_atomic(&NormalizedPath::new(&target), &content, RobustnessConfig::default())?;
        tracing::info!(
            from = %workspace.index.display(),
            to = %target.display(),
            "Copied index into root"
        );
        Ok((target, true))
    }
}

async fn materialize(probe: GitProbe, handle: Handle) -> ClonedRepository {
    let mut lifecycle = RepoLifecycle::Unmaterialized;
    let mut outcome = None;
    let mut added_remotes = Vec::new();

    match probe.clone().await {
        Ok(result) => {
            lifecycle.cloned();
            outcome = Some(result);
        }
        Err(e) => {
            tracing::warn!(repo = %probe, error = %e, "Clone failed");
            lifecycle.fail(e.to_string());
        }
    }

    if !lifecycle.is_terminal() {
        match probe.setup().await {
            Ok(added) => {
                added_remotes = added;
                lifecycle.configured();
            }
            Err(e) => {
                tracing::warn!(repo = %probe, error = %e, "Remote setup failed");
                lifecycle.fail(e.to_string());
            }
        }
    }

    ClonedRepository {
        relative: handle.relative,
        path: handle.path,
        outcome,
        added_remotes,
        lifecycle,
    }
}
