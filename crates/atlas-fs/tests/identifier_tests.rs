use atlas_fs::identifier::{self, IdentifierScheme, decode_str, relative_path, scheme_of};
use atlas_fs::{Error, decode, encode, encode_with};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
#[case("path:repo_a", "repo_a")]
#[case("path:space/simpsons", "space/simpsons")]
#[case("urn:relpath:repo_a", "repo_a")]
#[case("urn:relpath:space/simpsons", "space/simpsons")]
fn decode_strips_scheme_prefix(#[case] id: &str, #[case] expected: &str) {
    assert_eq!(decode(id).unwrap().as_str(), expected);
}

#[rstest]
#[case("")]
#[case("path:")]
#[case("urn:relpath:")]
#[case("https://example.org/repo.git")]
#[case("relpath:repo")]
#[case("path:path:repo")]
#[case("path:../x")]
#[case("path:/etc/x")]
#[case("urn:relpath:../x")]
#[case("path:a/../../x")]
#[case("path:C:/x")]
#[case("path:a\\b")]
#[case("path:a/./b")]
#[case("urn:relpath:a//b")]
#[case("path:a/")]
fn decode_rejects_malformed(#[case] id: &str) {
    let err = decode(id).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier { .. }), "got {err:?}");
    assert!(err.is_path_error());
}

#[test]
fn decode_leaves_remainder_untouched() {
    assert_eq!(decode_str("path:my repo/with space").unwrap(), "my repo/with space");
}

#[test]
fn scheme_of_distinguishes_schemes() {
    assert_eq!(scheme_of("path:a"), Some(IdentifierScheme::Path));
    assert_eq!(scheme_of("urn:relpath:a"), Some(IdentifierScheme::LegacyUrn));
    assert_eq!(scheme_of("urn:other:a"), None);
}

#[test]
fn encode_with_legacy_scheme() {
    let id = encode_with(IdentifierScheme::LegacyUrn, "/ws", "/ws/repo_b").unwrap();
    assert_eq!(id, "urn:relpath:repo_b");
}

#[test]
fn encode_outside_base_fails() {
    let err = encode("/ws/base", "/ws/other/repo").unwrap_err();
    match err {
        Error::InvalidPath { path, base } => {
            assert_eq!(path.to_string_lossy(), "/ws/other/repo");
            assert_eq!(base.to_string_lossy(), "/ws/base");
        }
        other => panic!("expected InvalidPath, got {other:?}"),
    }
}

#[test]
fn encode_rejects_parent_escape() {
    assert!(encode("/ws/base", "/ws/base/../escape").is_err());
}

#[test]
fn encode_normalizes_dot_segments() {
    assert_eq!(encode("/ws/./base", "/ws/base/a/./b").unwrap(), "path:a/b");
}

#[test]
fn relative_path_resolves_through_canonicalization() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real");
    std::fs::create_dir_all(real.join("repo")).unwrap();

    // Base spelled through a `..` detour still matches the same directory
    let detour = temp.path().join("real/repo/..");
    let rel = relative_path(&detour, real.join("repo")).unwrap();
    assert_eq!(rel.as_str(), "repo");
}

#[cfg(unix)]
#[test]
fn relative_path_follows_symlinked_base() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real");
    std::fs::create_dir_all(real.join("repo")).unwrap();
    let link = temp.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let rel = relative_path(&link, real.join("repo")).unwrap();
    assert_eq!(rel.as_str(), "repo");
}

#[test]
fn identify_builds_current_scheme() {
    let rel = atlas_fs::NormalizedPath::new("a/b");
    assert_eq!(IdentifierScheme::CURRENT.identify(&rel), "path:a/b");
    assert_eq!(identifier::IdentifierScheme::DECODE_ORDER[0], IdentifierScheme::Path);
}
