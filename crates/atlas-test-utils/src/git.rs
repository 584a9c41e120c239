//! Git repository fixtures at increasing realism levels.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs.
//! Everything above [`fake_git_dir`] shells out to the `git` CLI with a fixed
//! identity, so the host's global config never leaks into a fixture.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const AUTHOR_NAME: &str = "Test User";
const AUTHOR_EMAIL: &str = "test@test.com";

/// Run `git <args>` in `dir` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", AUTHOR_NAME)
        .env("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL)
        .env("GIT_COMMITTER_NAME", AUTHOR_NAME)
        .env("GIT_COMMITTER_EMAIL", AUTHOR_EMAIL)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}` in {}: {e}", dir.display()));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Creates a `.git` directory **without** initialising a repository.
///
/// Realism level: **FAKE**. Git itself does not accept this as a repository,
/// which is exactly what tests of "looks like a repo but is not" need.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
}

/// Initialises a real git repository using `git2` (no commit, no remotes).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a repository on branch `main` with one commit (`README.md`).
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to create dir: {e}"));
    git(path, &["init", "--quiet"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    commit_file(path, "README.md", "# Test", "Initial commit");
}

/// Write `name` with `content` and commit it.
///
/// # Panics
/// Panics if the write or any git operation fails.
pub fn commit_file(repo: &Path, name: &str, content: &str, message: &str) {
    let file = repo.join(name);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("commit_file: {e}"));
    }
    fs::write(&file, content).unwrap_or_else(|e| panic!("commit_file: failed to write {name}: {e}"));
    git(repo, &["add", name]);
    git(repo, &["commit", "--quiet", "-m", message]);
}

/// Add a remote using the CLI.
pub fn add_remote(repo: &Path, name: &str, url: &str) {
    git(repo, &["remote", "add", name, url]);
}

/// Add a remote whose push URL differs from its fetch URL.
pub fn add_mirrored_remote(repo: &Path, name: &str, fetch: &str, push: &str) {
    git(repo, &["remote", "add", name, fetch]);
    git(repo, &["remote", "set-url", "--push", name, push]);
}

/// Create a bare repository whose `main` holds one commit.
///
/// A scratch working copy is used to seed it and then discarded.
///
/// # Panics
/// Panics if any git operation fails.
pub fn seeded_bare_remote(path: &Path) -> PathBuf {
    fs::create_dir_all(path).unwrap_or_else(|e| panic!("seeded_bare_remote: {e}"));
    git(path, &["init", "--bare", "--quiet"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let seed = tempfile::TempDir::new().unwrap_or_else(|e| panic!("seeded_bare_remote: {e}"));
    real_git_repo_with_commit(seed.path());
    add_remote(seed.path(), "origin", &path.to_string_lossy());
    git(seed.path(), &["push", "--quiet", "origin", "main"]);

    path.to_path_buf()
}

/// Clone `url` into `dest` (which must not exist yet or be empty).
pub fn clone_into(url: &Path, dest: &Path) {
    let parent = dest.parent().unwrap_or(dest);
    fs::create_dir_all(parent).unwrap_or_else(|e| panic!("clone_into: {e}"));
    git(
        parent,
        &[
            "clone",
            "--quiet",
            &url.to_string_lossy(),
            &dest.to_string_lossy(),
        ],
    );
}

/// A clone whose `main` is 1 commit ahead of and 2 commits behind
/// `origin/main`.
pub struct DivergedClone {
    pub remote: PathBuf,
    pub clone: PathBuf,
}

/// Build a [`DivergedClone`] inside `root`.
///
/// Layout: `root/remote.git` (bare), `root/upstream-work` (second clone used
/// to push the two upstream commits) and `root/work` (the diverged clone).
pub fn diverged_clone(root: &Path) -> DivergedClone {
    let remote = seeded_bare_remote(&root.join("remote.git"));
    let clone = root.join("work");
    clone_into(&remote, &clone);

    let other = root.join("upstream-work");
    clone_into(&remote, &other);
    commit_file(&other, "upstream-1.txt", "1", "Upstream one");
    commit_file(&other, "upstream-2.txt", "2", "Upstream two");
    git(&other, &["push", "--quiet", "origin", "main"]);

    commit_file(&clone, "local.txt", "local", "Local work");
    git(&clone, &["fetch", "--quiet", "origin"]);

    DivergedClone { remote, clone }
}

/// Write an executable at `dir/git` that ignores its arguments and sleeps
/// for `seconds`, standing in for a git that hangs.
///
/// # Panics
/// Panics if the script cannot be written.
#[cfg(unix)]
pub fn hanging_git(dir: &Path, seconds: u32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir).unwrap_or_else(|e| panic!("hanging_git: {e}"));
    let script = dir.join("git");
    fs::write(&script, format!("#!/bin/sh\nexec sleep {seconds}\n"))
        .unwrap_or_else(|e| panic!("hanging_git: {e}"));
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("hanging_git: {e}"));
    script
}
