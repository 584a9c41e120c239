//! Locating the root directory and catalog file.

use std::fs;
use std::path::Path;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use atlas_core::{Error, Workspace, locate};
use pretty_assertions::assert_eq;

const NAME: &str = "workspaces.ttl";

#[test]
fn index_in_cwd_is_found() {
    let temp = TempDir::new().unwrap();
    temp.child(NAME).touch().unwrap();

    let ws = locate(None, None, temp.path(), NAME).unwrap();

    assert_eq!(ws, Workspace::new(temp.path(), temp.path().join(NAME)));
}

#[test]
fn index_in_parent_is_found_from_child() {
    let temp = TempDir::new().unwrap();
    temp.child(NAME).touch().unwrap();
    temp.child("repo/src").create_dir_all().unwrap();

    let ws = locate(None, None, &temp.path().join("repo/src"), NAME).unwrap();

    assert_eq!(ws.root, temp.path());
    assert_eq!(ws.index, temp.path().join(NAME));
}

#[test]
fn dot_root_resolves_against_cwd() {
    let temp = TempDir::new().unwrap();
    temp.child(NAME).touch().unwrap();

    let ws = locate(Some(Path::new(".")), None, temp.path(), NAME).unwrap();

    assert_eq!(ws.root, temp.path());
    assert!(ws.index.is_file());
}

#[test]
fn root_only_names_the_default_index_even_if_missing() {
    let temp = TempDir::new().unwrap();

    let ws = locate(Some(temp.path()), None, Path::new("/"), NAME).unwrap();

    assert_eq!(ws.index, temp.path().join(NAME));
    assert!(!ws.index.exists());
    assert!(matches!(ws.require_index(), Err(Error::IndexNotFound { .. })));
}

#[test]
fn explicit_index_with_any_name_sets_the_root() {
    let temp = TempDir::new().unwrap();
    let index = temp.child("my_repos.ttl");
    index.touch().unwrap();

    let ws = locate(None, Some(index.path()), Path::new("/"), NAME).unwrap();

    assert_eq!(ws.root, temp.path());
    assert_eq!(ws.index, index.path());
    assert!(ws.index_in_root());
}

#[test]
fn index_from_backup_keeps_the_given_root() {
    let temp = TempDir::new().unwrap();
    let workspaces = temp.child("workspaces");
    workspaces.create_dir_all().unwrap();
    temp.child("backup").create_dir_all().unwrap();
    let index = temp.child("backup/all_of_my_work.ttl");
    index.touch().unwrap();

    let ws = locate(Some(workspaces.path()), Some(index.path()), Path::new("/"), NAME).unwrap();

    assert_eq!(ws.root, workspaces.path());
    assert_eq!(ws.index, index.path());
    assert!(!ws.index_in_root());
}

#[test]
fn relative_index_resolves_against_cwd() {
    let temp = TempDir::new().unwrap();
    temp.child("backup").create_dir_all().unwrap();
    temp.child("backup/workspaces.ttl").touch().unwrap();
    temp.child("ws").create_dir_all().unwrap();

    let ws = locate(
        None,
        Some(Path::new("../backup/workspaces.ttl")),
        &temp.path().join("ws"),
        NAME,
    )
    .unwrap();

    assert_eq!(ws.index, temp.path().join("backup/workspaces.ttl"));
    assert_eq!(ws.root, temp.path().join("backup"));
}

#[test]
fn nothing_found_is_index_not_found() {
    let temp = TempDir::new().unwrap();
    let start = temp.path().join("deep/inside");
    fs::create_dir_all(&start).unwrap();

    let err = locate(None, None, &start, "no-such-index-anywhere.ttl").unwrap_err();

    assert!(matches!(err, Error::IndexNotFound { .. }), "got {err:?}");
}

#[test]
fn missing_root_is_rejected() {
    let temp = TempDir::new().unwrap();

    let err = locate(Some(&temp.path().join("nope")), None, temp.path(), NAME).unwrap_err();

    assert!(matches!(err, Error::InvalidRoot { .. }));
}
