//! `list`: live status of cataloged repositories.

use std::path::Path;

use atlas_catalog::{Catalog, Handle};
use atlas_fs::{NormalizedPath, identifier};
use serde::Serialize;

use super::Atlas;
use crate::Result;
use crate::status::{StatusRecord, classify};
use crate::workspace::Workspace;

/// A cataloged repository with its classified status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
    pub relative: NormalizedPath,
    #[serde(flatten)]
    pub status: StatusRecord,
}

impl Atlas {
    /// Probe and classify every cataloged repository, sorted by path.
    ///
    /// When `scope` lies inside the root only repositories below it are
    /// listed.
    pub async fn list(&self, workspace: &Workspace, scope: Option<&Path>) -> Result<Vec<RepositoryStatus>> {
        workspace.require_index()?;
        let catalog = Catalog::open(&workspace.index, &workspace.root)?;
        let handles = scoped_handles(&catalog, scope);

        let prober = self.prober(workspace);
        self.pool()
            .run(handles, move |handle: Handle| {
                let probe = prober.probe(&handle.path);
                async move {
                    let snapshot = probe.snapshot().await;
                    RepositoryStatus {
                        relative: handle.relative,
                        status: classify(&snapshot),
                    }
                }
            })
            .await
    }

    /// Absolute paths of the cataloged repositories, without probing.
    pub fn list_plain(&self, workspace: &Workspace, scope: Option<&Path>) -> Result<Vec<String>> {
        workspace.require_index()?;
        let catalog = Catalog::open(&workspace.index, &workspace.root)?;
        if scope.is_some_and(|dir| is_inside(&catalog, dir)) {
            return Ok(scoped_handles(&catalog, scope)
                .into_iter()
                .map(|handle| handle.path.display().to_string())
                .collect());
        }
        Ok(catalog.list_display_strings())
    }
}

fn scoped_handles(catalog: &Catalog, scope: Option<&Path>) -> Vec<Handle> {
    match scope {
        Some(dir) if is_inside(catalog, dir) => catalog.list_handles_under(dir),
        _ => catalog.list_handles(),
    }
}

fn is_inside(catalog: &Catalog, dir: &Path) -> bool {
    identifier::relative_path(catalog.base(), dir).is_ok()
}
