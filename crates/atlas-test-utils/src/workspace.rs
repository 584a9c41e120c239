//! [`TestWorkspace`]: a temporary workspace root for catalog scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// A temporary directory acting as a workspace base.
///
/// # Example
///
/// ```rust,no_run
/// use atlas_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.add_repo("space/simpsons");
/// ws.add_plain_dir("notes");
/// ws.assert_exists("space/simpsons/.git");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the workspace.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Default index location, `<root>/workspaces.ttl`.
    pub fn index_path(&self) -> PathBuf {
        self.root().join("workspaces.ttl")
    }

    /// Create a repository with one commit at `relative`.
    pub fn add_repo(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        git::real_git_repo_with_commit(&path);
        path
    }

    /// Create a repository with one commit and an `origin` remote.
    pub fn add_repo_with_origin(&self, relative: &str, url: &str) -> PathBuf {
        let path = self.add_repo(relative);
        git::add_remote(&path, "origin", url);
        path
    }

    /// Create a directory that is not a repository.
    pub fn add_plain_dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write the index file at its default location.
    pub fn write_index(&self, content: &str) -> PathBuf {
        let index = self.index_path();
        fs::write(&index, content).unwrap();
        index
    }

    /// Read the index file at its default location.
    pub fn read_index(&self) -> String {
        fs::read_to_string(self.index_path())
            .unwrap_or_else(|e| panic!("Could not read index {}: {e}", self.index_path().display()))
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(full_path.exists(), "Expected path to exist: {}", full_path.display());
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}
