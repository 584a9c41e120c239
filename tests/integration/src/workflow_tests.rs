//! Whole workflows across every layer: walk, probe, catalog, status.

use std::fs;
use std::path::Path;

use atlas_catalog::Catalog;
use atlas_core::{Atlas, AtlasConfig, BranchFlag, CloneSelection, Error, RepoFlag, ScanOptions, Workspace};
use atlas_git::{GitProbe, RepoLifecycle};
use atlas_test_utils::git;
use atlas_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn atlas() -> Atlas {
    Atlas::new(AtlasConfig::default())
}

fn workspace_at(root: &Path) -> Workspace {
    Workspace::new(root, root.join("workspaces.ttl"))
}

/// Index a workspace, restore it somewhere else from the catalog alone and
/// check that the restored repositories look like the originals.
#[tokio::test]
async fn index_restore_and_list_round_trip() {
    let remotes = TestWorkspace::new();
    let simpsons = git::seeded_bare_remote(&remotes.path("simpsons.git"));
    let flanders = git::seeded_bare_remote(&remotes.path("flanders.git"));

    let source = TestWorkspace::new();
    git::clone_into(&simpsons, &source.path("space/simpsons"));
    git::clone_into(&flanders, &source.path("space/flanders"));
    git::add_remote(&source.path("space/flanders"), "backup", &simpsons.to_string_lossy());
    let atlas = atlas();
    atlas.index(&workspace_at(source.root())).await.unwrap();

    let target = TestWorkspace::new();
    let restore = Workspace::new(target.root(), source.index_path());
    let report = atlas.clone(&restore, CloneSelection::All).await.unwrap();

    assert!(report.is_success(), "{report:?}");
    assert!(report.index_copied);
    for repo in &report.repositories {
        assert_eq!(repo.lifecycle, RepoLifecycle::Configured);
    }

    let restored = atlas.list(&workspace_at(target.root()), None).await.unwrap();
    let original = atlas.list(&workspace_at(source.root()), None).await.unwrap();
    let summary = |listed: &[atlas_core::RepositoryStatus]| {
        listed
            .iter()
            .map(|r| (r.relative.as_str().to_string(), r.status.flags.clone(), r.status.attention_needed()))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&restored), summary(&original));

    let flanders_remotes = GitProbe::new(target.path("space/flanders")).remotes().await.clone();
    assert!(flanders_remotes.contains_key("backup"));
}

#[tokio::test]
async fn divergence_is_reported_through_list() {
    let ws = TestWorkspace::new();
    let fixture = git::diverged_clone(ws.root());
    fs::write(fixture.clone.join("README.md"), "changed").unwrap();
    git::git(&fixture.clone, &["stash", "--quiet"]);
    let atlas = atlas();
    atlas.index(&workspace_at(ws.root())).await.unwrap();

    let listed = atlas.list(&workspace_at(ws.root()), None).await.unwrap();
    let work = listed.iter().find(|r| r.relative.as_str() == "work").unwrap();

    assert!(work.status.has(RepoFlag::Stashed));
    assert!(!work.status.has(RepoFlag::Dirty));
    assert_eq!(work.status.branches[0].flag, BranchFlag::Diverged { behind: 2, ahead: 1 });
}

#[tokio::test]
async fn relocated_workspace_keeps_working() {
    let outer = TestWorkspace::new();
    let original = outer.path("before");
    let remote = git::seeded_bare_remote(&outer.path("remote.git"));
    git::clone_into(&remote, &original.join("group/app"));
    let atlas = atlas();
    atlas.index(&workspace_at(&original)).await.unwrap();

    let moved = outer.path("after");
    fs::rename(&original, &moved).unwrap();

    let listed = atlas.list(&workspace_at(&moved), None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].status.is_repo());
    assert!(!listed[0].status.attention_needed());

    let index = fs::read_to_string(moved.join("workspaces.ttl")).unwrap();
    assert!(!index.contains(&*original.to_string_lossy()));
}

#[tokio::test]
async fn legacy_catalog_is_migrated_by_scan() {
    let ws = TestWorkspace::new();
    ws.add_repo_with_origin("space/simpsons", "https://example.org/simpsons.git");
    ws.write_index(
        "@prefix gw: <https://git-watch/> .\n\
         <urn:relpath:space/simpsons> a gw:repo ;\n    gw:remote <urn:relpath:space/simpsons#remote:origin> .\n\
         <urn:relpath:space/simpsons#remote:origin> gw:fetch <https://example.org/old.git> .\n",
    );

    atlas()
        .scan(&workspace_at(ws.root()), ScanOptions::default())
        .await
        .unwrap();

    let text = ws.read_index();
    assert!(!text.contains("urn:relpath:"), "index was:\n{text}");
    assert!(!text.contains("git-watch"), "index was:\n{text}");
    let catalog = Catalog::open(ws.index_path(), ws.root()).unwrap();
    let handle = catalog.find("space/simpsons").unwrap();
    assert_eq!(
        catalog.remotes_for(&handle)["origin"].fetch,
        "https://example.org/simpsons.git"
    );
}

#[tokio::test]
async fn cancelled_scan_writes_nothing() {
    let ws = TestWorkspace::new();
    ws.add_repo("a");
    ws.write_index("# untouched\n");

    let token = CancellationToken::new();
    token.cancel();
    let atlas = atlas().with_cancellation(token);

    let err = atlas.index(&workspace_at(ws.root())).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(ws.read_index(), "# untouched\n");
}

#[tokio::test]
async fn catalog_json_listing_is_stable() {
    let ws = TestWorkspace::new();
    ws.add_repo_with_origin("b", "https://example.org/b.git");
    ws.add_repo_with_origin("a", "https://example.org/a.git");
    let atlas = atlas();
    atlas.index(&workspace_at(ws.root())).await.unwrap();

    let first = atlas.list(&workspace_at(ws.root()), None).await.unwrap();
    let second = atlas.list(&workspace_at(ws.root()), None).await.unwrap();

    let strip = |listed: &[atlas_core::RepositoryStatus]| {
        let mut value = serde_json::to_value(listed).unwrap();
        for entry in value.as_array_mut().unwrap() {
            entry.as_object_mut().unwrap().remove("path");
        }
        value
    };
    assert_eq!(strip(&first), strip(&second));
    assert_eq!(first[0].relative.as_str(), "a");
}
