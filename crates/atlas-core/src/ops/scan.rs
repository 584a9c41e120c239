//! `index` and `scan`: record repositories and their remotes.

use std::path::PathBuf;

use atlas_catalog::{Catalog, RejectedEntry, RepositoryEntry};
use atlas_fs::NormalizedPath;
use atlas_git::GitProbe;

use super::Atlas;
use crate::walk::{self, WalkOptions};
use crate::workspace::Workspace;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Walk the root for repositories instead of re-probing cataloged ones.
    pub discover: bool,
    /// `git fetch --all` in every repository before reading its state.
    pub fetch: bool,
}

/// Outcome of [`Atlas::index`] or [`Atlas::scan`].
#[derive(Debug)]
pub struct ScanReport {
    pub index: PathBuf,
    /// Relative paths recorded, sorted.
    pub written: Vec<NormalizedPath>,
    pub rejected: Vec<RejectedEntry>,
    /// Probed paths that are not repositories. Their records, if any, are
    /// left as they were.
    pub skipped: Vec<PathBuf>,
}

enum Probed {
    Repository(RepositoryEntry),
    NotARepo(PathBuf),
}

impl Atlas {
    /// Discover every repository below the root and record it.
    pub async fn index(&self, workspace: &Workspace) -> Result<ScanReport> {
        self.scan(
            workspace,
            ScanOptions {
                discover: true,
                fetch: false,
            },
        )
        .await
    }

    /// Refresh the remotes recorded in the catalog.
    pub async fn scan(&self, workspace: &Workspace, options: ScanOptions) -> Result<ScanReport> {
        if !workspace.root.is_dir() {
            return Err(Error::InvalidRoot {
                path: workspace.root.clone(),
            });
        }
        let mut catalog = Catalog::open(&workspace.index, &workspace.root)?;

        let candidates = if options.discover {
            let root = workspace.root.clone();
            let walk = WalkOptions {
                skip_hidden: self.config.scan.skip_hidden,
            };
            tokio::task::spawn_blocking(move || walk::discover(&root, walk)).await??
        } else {
            catalog
                .list_handles()
                .into_iter()
                .map(|handle| handle.path)
                .collect()
        };
        tracing::info!(
            root = %workspace.root.display(),
            candidates = candidates.len(),
            discover = options.discover,
            "Probing repositories"
        );

        let prober = self.prober(workspace);
        let fetch = options.fetch;
        let probed = self
            .pool()
            .run(candidates, move |path| {
                let probe = prober.probe(path);
                async move { read_entry(probe, fetch).await }
            })
            .await?;

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        for result in probed {
            match result {
                Probed::Repository(entry) => entries.push(entry),
                Probed::NotARepo(path) => {
                    if !options.discover {
                        tracing::warn!(path = %path.display(), "Cataloged path is not a repository, keeping its record");
                    }
                    skipped.push(path);
                }
            }
        }

        let upsert = catalog.upsert_all(&entries)?;
        let mut written = upsert.written;
        written.sort();

        Ok(ScanReport {
            index: workspace.index.clone(),
            written,
            rejected: upsert.rejected,
            skipped,
        })
    }
}

async fn read_entry(probe: GitProbe, fetch: bool) -> Probed {
    if !probe.is_repo().await {
        tracing::debug!(repo = %probe, "Not a repository");
        return Probed::NotARepo(probe.path().to_path_buf());
    }
    if fetch && let Err(e) = probe.fetch_all().await {
        tracing::warn!(repo = %probe, error = %e, "Fetch failed, recording current remotes");
    }
    let remotes = probe.remotes().await.clone();
    Probed::Repository(RepositoryEntry::new(probe.path(), remotes))
}
