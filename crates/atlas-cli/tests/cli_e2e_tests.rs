//! End-to-end tests that run the compiled `atlas` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use atlas_test_utils::git;
use atlas_test_utils::workspace::TestWorkspace;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

/// Get a Command for the atlas binary, isolated from user configuration
fn atlas_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("atlas").expect("Failed to find atlas binary");
    cmd.current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ATLAS_CONFIG");
    cmd
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    let temp = tempfile::tempdir().unwrap();
    atlas_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("clone"));
}

#[test]
fn test_clone_without_target_is_misuse() {
    let temp = tempfile::tempdir().unwrap();
    atlas_cmd(temp.path())
        .arg("clone")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--all"));
}

#[test]
fn test_unknown_flag_is_misuse() {
    let temp = tempfile::tempdir().unwrap();
    atlas_cmd(temp.path())
        .args(["list", "--bogus"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_root_fails() {
    let temp = tempfile::tempdir().unwrap();
    atlas_cmd(temp.path())
        .args(["index", "does-not-exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_explicit_config_must_exist() {
    let ws = TestWorkspace::new();
    atlas_cmd(ws.root())
        .args(["--config", "missing.toml", "index", "."])
        .assert()
        .code(1);
}

// ============================================================================
// index / list
// ============================================================================

#[test]
fn test_index_then_list() {
    let ws = TestWorkspace::new();
    ws.add_repo("repo_a");
    ws.add_repo_with_origin("repo_b", "https://example.org/repo_a.git");

    atlas_cmd(ws.root())
        .args(["index", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 2 repositories"));

    let index = ws.read_index();
    assert!(index.contains("<path:repo_a>"));
    assert!(index.contains("<https://example.org/repo_a.git>"));

    atlas_cmd(ws.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo_a"))
        .stdout(predicate::str::contains("no remote"))
        .stdout(predicate::str::contains("repo_b"));
}

#[test]
fn test_list_plain_inside_a_subdirectory() {
    let ws = TestWorkspace::new();
    ws.add_repo("space/simpsons");
    ws.add_repo("other/thing");
    atlas_cmd(ws.root()).args(["index", "."]).assert().success();

    let output = atlas_cmd(&ws.path("space"))
        .args(["list", "--plain"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert_eq!(stdout.lines().count(), 1, "got:\n{stdout}");
    assert!(stdout.contains("simpsons"));
}

#[test]
fn test_list_json_is_machine_readable() {
    let ws = TestWorkspace::new();
    ws.add_repo("solo");
    atlas_cmd(ws.root()).args(["index", "."]).assert().success();

    let output = atlas_cmd(ws.root())
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(value[0]["relative"], "solo");
    assert_eq!(value[0]["flags"][0], "no_remote");
}

#[test]
fn test_list_without_index_fails() {
    let ws = TestWorkspace::new();
    atlas_cmd(ws.root())
        .args(["list", "-i", "nowhere.ttl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nowhere.ttl"));
}

// ============================================================================
// scan / clone
// ============================================================================

#[test]
fn test_scan_with_discover_picks_up_new_repositories() {
    let ws = TestWorkspace::new();
    ws.add_repo("first");
    atlas_cmd(ws.root()).args(["index", "."]).assert().success();
    ws.add_repo("second");

    atlas_cmd(ws.root())
        .args(["scan", ".", "--discover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 2 repositories"));
}

#[test]
fn test_clone_all_restores_from_backup_index() {
    let source = TestWorkspace::new();
    let remote = git::seeded_bare_remote(&source.path("remotes/simpsons.git"));
    git::clone_into(&remote, &source.path("space/simpsons"));
    atlas_cmd(source.root()).args(["index", "."]).assert().success();

    let backup = TestWorkspace::new();
    let backup_index = backup.path("all_of_my_work.ttl");
    fs::copy(source.index_path(), &backup_index).unwrap();
    let target = TestWorkspace::new();

    atlas_cmd(target.root())
        .arg("clone")
        .arg("--all")
        .arg("-r")
        .arg(target.root())
        .arg("-i")
        .arg(&backup_index)
        .assert()
        .success()
        .stdout(predicate::str::contains("cloned from origin"));

    target.assert_exists("space/simpsons/.git");
    target.assert_exists("space/simpsons/README.md");
    target.assert_exists("workspaces.ttl");
}

#[test]
fn test_clone_reports_failures_alongside_successes() {
    let ws = TestWorkspace::new();
    let remote = git::seeded_bare_remote(&ws.path("remotes/simpsons.git"));
    ws.write_index(&format!(
        "@prefix atlas: <https://toelpel/> .\n\
         <path:orphan> a atlas:repo .\n\
         <path:space/simpsons> a atlas:repo ;\n    atlas:remote <path:space/simpsons#remote:origin> .\n\
         <path:space/simpsons#remote:origin> atlas:fetch <{url}> ;\n    atlas:push <{url}> .\n",
        url = remote.display()
    ));

    atlas_cmd(ws.root())
        .args(["clone", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ orphan"))
        .stdout(predicate::str::contains("1 of 2 repositories failed to clone"));

    ws.assert_exists("space/simpsons/README.md");
}

#[test]
fn test_clone_single_repository_relative_to_cwd() {
    let ws = TestWorkspace::new();
    let remote = git::seeded_bare_remote(&ws.path("remotes/simpsons.git"));
    git::clone_into(&remote, &ws.path("space/simpsons"));
    git::clone_into(&remote, &ws.path("space/flanders"));
    atlas_cmd(ws.root()).args(["index", "."]).assert().success();
    fs::remove_dir_all(ws.path("space/simpsons")).unwrap();
    fs::remove_dir_all(ws.path("space/flanders")).unwrap();

    atlas_cmd(&ws.path("space"))
        .args(["clone", "simpsons"])
        .assert()
        .success();

    ws.assert_exists("space/simpsons/README.md");
    ws.assert_not_exists("space/flanders");
}

#[test]
fn test_config_from_environment_changes_index_name() {
    let ws = TestWorkspace::new();
    ws.add_repo("a");
    let config = ws.path("atlas.toml");
    fs::write(&config, "[scan]\nindex_name = \"repos.ttl\"\n").unwrap();

    atlas_cmd(ws.root())
        .env("ATLAS_CONFIG", &config)
        .args(["index", "."])
        .assert()
        .success();

    ws.assert_exists("repos.ttl");
    ws.assert_not_exists("workspaces.ttl");
}
