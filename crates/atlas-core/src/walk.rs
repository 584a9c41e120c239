//! Discovery walk below a root directory.
//!
//! The walk only looks at the filesystem: a directory holding a `.git` entry
//! is a candidate and is not descended into. Candidates are confirmed with
//! git afterwards, see [`GitProbe::is_repo`](atlas_git::GitProbe::is_repo).

use std::fs;
use std::path::{Path, PathBuf};

use atlas_fs::WorkspacePath;
use ignore::{DirEntry, WalkBuilder};

use crate::{Error, Result};

/// Options for [`discover`].
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Skip directories whose name starts with a dot.
    pub skip_hidden: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { skip_hidden: true }
    }
}

/// Candidate repository directories strictly below `root`, sorted.
///
/// Symbolic links are not followed and ignore files are not consulted.
/// Subdirectories that cannot be read are logged and skipped; an unreadable
/// `root` is an error.
pub fn discover(root: &Path, options: WalkOptions) -> Result<Vec<PathBuf>> {
    fs::read_dir(root).map_err(|_| Error::InvalidRoot {
        path: root.to_path_buf(),
    })?;

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(options.skip_hidden)
        .follow_links(false)
        // Evaluated before descending: only real directories, never `.git`,
        // never anything below a candidate
        .filter_entry(|entry| {
            entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry.file_name() != WorkspacePath::GitMarker.as_str()
                && !inside_candidate(entry)
        });

    let mut found = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) if entry.depth() > 0 && is_candidate(entry.path()) => {
                tracing::debug!(path = %entry.path().display(), "Found repository candidate");
                found.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Cannot read directory, skipping"),
        }
    }

    found.sort();
    tracing::info!(root = %root.display(), candidates = found.len(), "Discovery walk finished");
    Ok(found)
}

fn is_candidate(dir: &Path) -> bool {
    dir.join(WorkspacePath::GitMarker).exists()
}

fn inside_candidate(entry: &DirEntry) -> bool {
    entry.depth() > 1 && entry.path().parent().is_some_and(is_candidate)
}
