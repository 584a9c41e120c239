//! `list` against real repositories.

use std::fs;

use atlas_core::{Atlas, AtlasConfig, BranchFlag, Error, RepoFlag, Workspace};
use atlas_test_utils::git;
use atlas_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;

async fn indexed(ws: &TestWorkspace) -> (Atlas, Workspace) {
    let atlas = Atlas::new(AtlasConfig::default());
    let workspace = Workspace::new(ws.root(), ws.index_path());
    atlas.index(&workspace).await.unwrap();
    (atlas, workspace)
}

#[tokio::test]
async fn diverged_and_dirty_repositories_need_attention() {
    let ws = TestWorkspace::new();
    git::diverged_clone(ws.root());
    let clean = ws.add_repo_with_origin("clean", "https://example.org/clean.git");
    fs::write(clean.join("scratch.txt"), "wip").unwrap();
    let (atlas, workspace) = indexed(&ws).await;

    let listed = atlas.list(&workspace, None).await.unwrap();

    let names: Vec<_> = listed.iter().map(|r| r.relative.as_str()).collect();
    assert_eq!(names, vec!["clean", "upstream-work", "work"]);

    let work = &listed[2].status;
    assert_eq!(work.branches[0].flag, BranchFlag::Diverged { behind: 2, ahead: 1 });
    assert!(work.attention_needed());

    let dirty = &listed[0].status;
    assert!(dirty.has(RepoFlag::Dirty));
    assert!(dirty.has(RepoFlag::LocalBranches));
}

#[tokio::test]
async fn missing_directory_is_listed_as_not_a_repo() {
    let ws = TestWorkspace::new();
    ws.add_repo("soon-gone");
    let (atlas, workspace) = indexed(&ws).await;
    fs::remove_dir_all(ws.path("soon-gone")).unwrap();

    let listed = atlas.list(&workspace, None).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert!(!listed[0].status.is_repo());
}

#[tokio::test]
async fn scope_inside_root_filters_the_listing() {
    let ws = TestWorkspace::new();
    ws.add_repo("space/simpsons");
    ws.add_repo("space/flanders");
    ws.add_repo("other/thing");
    let (atlas, workspace) = indexed(&ws).await;

    let scoped = atlas.list(&workspace, Some(&ws.path("space"))).await.unwrap();
    let names: Vec<_> = scoped.iter().map(|r| r.relative.as_str()).collect();
    assert_eq!(names, vec!["space/flanders", "space/simpsons"]);

    let from_root = atlas.list_plain(&workspace, Some(ws.root())).unwrap();
    assert_eq!(from_root.len(), 3);

    let outside = tempfile::tempdir().unwrap();
    let unrelated = atlas.list_plain(&workspace, Some(outside.path())).unwrap();
    assert_eq!(unrelated.len(), 3);
}

#[tokio::test]
async fn plain_listing_does_not_probe() {
    let ws = TestWorkspace::new();
    ws.add_repo("a");
    let (atlas, workspace) = indexed(&ws).await;
    fs::remove_dir_all(ws.path("a")).unwrap();

    let plain = atlas.list_plain(&workspace, None).unwrap();

    assert_eq!(plain, vec![ws.path("a").display().to_string()]);
}

#[tokio::test]
async fn listing_without_index_fails() {
    let ws = TestWorkspace::new();
    let atlas = Atlas::new(AtlasConfig::default());

    let err = atlas
        .list(&Workspace::new(ws.root(), ws.index_path()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::IndexNotFound { .. }));
}

#[tokio::test]
async fn status_serializes_with_relative_path() {
    let ws = TestWorkspace::new();
    ws.add_repo("solo");
    let (atlas, workspace) = indexed(&ws).await;

    let listed = atlas.list(&workspace, None).await.unwrap();
    let json = serde_json::to_value(&listed[0]).unwrap();

    assert_eq!(json["relative"], "solo");
    assert_eq!(json["flags"], serde_json::json!(["no_remote"]));
    assert_eq!(json["branches"][0]["flag"]["state"], "untracked");
}
