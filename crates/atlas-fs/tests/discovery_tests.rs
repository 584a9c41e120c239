use assert_fs::prelude::*;
use atlas_fs::{WorkspacePath, find_index};
use predicates::prelude::*;

#[test]
fn find_index_in_current_dir() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(WorkspacePath::DefaultIndex.as_str()).touch().unwrap();

    let found = find_index(temp.path(), WorkspacePath::DefaultIndex.as_str()).unwrap();

    assert_eq!(found, temp.path().join("workspaces.ttl"));
}

#[test]
fn find_index_in_ancestor() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("workspaces.ttl").touch().unwrap();
    let nested = temp.child("space/simpsons/src");
    nested.create_dir_all().unwrap();

    let found = find_index(nested.path(), "workspaces.ttl").unwrap();

    temp.child("workspaces.ttl").assert(predicate::path::is_file());
    assert_eq!(found, temp.path().join("workspaces.ttl"));
}

#[test]
fn find_index_prefers_closest() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("workspaces.ttl").touch().unwrap();
    temp.child("inner/workspaces.ttl").touch().unwrap();
    let nested = temp.child("inner/deeper");
    nested.create_dir_all().unwrap();

    let found = find_index(nested.path(), "workspaces.ttl").unwrap();

    assert_eq!(found, temp.path().join("inner/workspaces.ttl"));
}

#[test]
fn find_index_ignores_directories_with_index_name() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a/some-unlikely-index-name.ttl").create_dir_all().unwrap();

    assert!(find_index(&temp.path().join("a"), "some-unlikely-index-name.ttl").is_none());
}
