use atlas_fs::{IdentifierScheme, NormalizedPath, decode, encode_with};
use proptest::prelude::*;
use std::path::PathBuf;

fn relative_components() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9_][A-Za-z0-9_.-]{0,11}", 1..6)
}

fn any_scheme() -> impl Strategy<Value = IdentifierScheme> {
    prop_oneof![Just(IdentifierScheme::Path), Just(IdentifierScheme::LegacyUrn)]
}

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // A leading `//` marks a network path; nothing else may double up
        let is_network = as_str.starts_with("//") && !as_str.starts_with("///");
        if is_network {
            prop_assert!(!as_str[2..].contains("//"));
        } else {
            prop_assert!(!as_str.contains("//"));
        }

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn identifier_round_trip(components in relative_components(), scheme in any_scheme()) {
        let base = PathBuf::from("/workspace/base");
        let relative = components.join("/");
        let repo = base.join(&relative);

        let id = encode_with(scheme, &base, &repo).unwrap();
        prop_assert!(id.starts_with(scheme.prefix()));

        let decoded = decode(&id).unwrap();
        prop_assert_eq!(decoded.as_str(), relative.as_str());
    }

    #[test]
    fn identifier_independent_of_base_location(
        components in relative_components(),
        base_a in "/[a-z]{1,8}",
        base_b in "/[a-z]{1,8}/[a-z]{1,8}",
    ) {
        let relative = components.join("/");
        let id_a = encode_with(IdentifierScheme::Path, &base_a, PathBuf::from(&base_a).join(&relative)).unwrap();
        let id_b = encode_with(IdentifierScheme::Path, &base_b, PathBuf::from(&base_b).join(&relative)).unwrap();
        prop_assert_eq!(id_a, id_b);
    }
}
