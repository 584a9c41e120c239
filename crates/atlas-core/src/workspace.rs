//! Resolving the root directory and catalog file of a workspace.

use std::path::{Path, PathBuf};

use atlas_fs::{NormalizedPath, discovery};

use crate::{Error, Result};

/// A root directory and the catalog file describing it.
///
/// The catalog does not have to live inside the root: restoring a workspace
/// from a backup reads the catalog from elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub index: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, index: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: index.into(),
        }
    }

    /// Whether the catalog file sits directly inside the root.
    pub fn index_in_root(&self) -> bool {
        match self.index.parent() {
            Some(parent) => same_dir(parent, &self.root),
            None => false,
        }
    }

    /// Fail with [`Error::IndexNotFound`] unless the catalog file exists.
    pub fn require_index(&self) -> Result<()> {
        if self.index.is_file() {
            return Ok(());
        }
        Err(Error::IndexNotFound {
            start: self.index.parent().unwrap_or(&self.root).to_path_buf(),
            name: self
                .index
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// Work out the workspace from what the user gave.
///
/// - `index` given: the root is `root`, or else the index's directory.
/// - only `root` given: the index is `root/<name>`; it may not exist yet.
/// - neither: `<name>` is searched in `cwd` and its ancestors, and its
///   directory becomes the root.
///
/// Relative paths are taken relative to `cwd`. A given root must be an
/// existing directory.
pub fn locate(root: Option<&Path>, index: Option<&Path>, cwd: &Path, name: &str) -> Result<Workspace> {
    let root = root.map(|root| absolute(cwd, root));
    if let Some(root) = &root
        && !root.is_dir()
    {
        return Err(Error::InvalidRoot { path: root.clone() });
    }

    let workspace = match (root, index) {
        (root, Some(index)) => {
            let index = absolute(cwd, index);
            let root = match root {
                Some(root) => root,
                None => parent_of(&index),
            };
            Workspace::new(root, index)
        }
        (Some(root), None) => {
            let index = root.join(name);
            Workspace::new(root, index)
        }
        (None, None) => {
            let index = discovery::find_index(cwd, name).ok_or_else(|| Error::IndexNotFound {
                start: cwd.to_path_buf(),
                name: name.to_string(),
            })?;
            Workspace::new(parent_of(&index), index)
        }
    };

    tracing::debug!(
        root = %workspace.root.display(),
        index = %workspace.index.display(),
        "Located workspace"
    );
    Ok(workspace)
}

/// `path` made absolute against `cwd`, with `.` and `..` resolved lexically.
pub(crate) fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    NormalizedPath::new(joined).to_native()
}

fn parent_of(index: &Path) -> PathBuf {
    index
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if NormalizedPath::new(a) == NormalizedPath::new(b) {
        return true;
    }
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_resolves_dot_segments() {
        let cwd = Path::new("/home/me/work");
        assert_eq!(absolute(cwd, Path::new(".")), PathBuf::from("/home/me/work"));
        assert_eq!(absolute(cwd, Path::new("../backup")), PathBuf::from("/home/me/backup"));
        assert_eq!(absolute(cwd, Path::new("/srv/ws")), PathBuf::from("/srv/ws"));
    }

    #[test]
    fn index_in_root_compares_lexically() {
        let ws = Workspace::new("/srv/ws", "/srv/ws/./workspaces.ttl");
        assert!(ws.index_in_root());

        let ws = Workspace::new("/srv/ws", "/srv/backup/workspaces.ttl");
        assert!(!ws.index_in_root());
    }
}
