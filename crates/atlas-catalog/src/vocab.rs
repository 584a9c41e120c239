//! Catalog vocabulary.

use atlas_git::Direction;

/// Namespace of all catalog predicates and classes.
pub const NAMESPACE: &str = "https://toelpel/";

/// Namespace written by older versions, accepted on read.
pub const LEGACY_NAMESPACE: &str = "https://git-watch/";

/// Prefix label used when writing.
pub const PREFIX: &str = "atlas";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Separator between a repository identifier and a remote name.
pub const REMOTE_MARKER: &str = "#remote:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocab {
    /// Class of repository records.
    Repo,
    /// Links a repository to one of its remote records.
    Remote,
    Fetch,
    Push,
}

impl Vocab {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Remote => "remote",
            Self::Fetch => "fetch",
            Self::Push => "push",
        }
    }

    /// IRI in the current namespace.
    pub fn iri(&self) -> String {
        format!("{NAMESPACE}{}", self.local_name())
    }

    /// IRIs accepted on read, current namespace first.
    pub fn read_iris(&self) -> [String; 2] {
        [self.iri(), format!("{LEGACY_NAMESPACE}{}", self.local_name())]
    }
}

impl From<Direction> for Vocab {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Fetch => Self::Fetch,
            Direction::Push => Self::Push,
        }
    }
}

/// Node IRI of remote `name` of repository `repo_id`.
pub fn remote_node(repo_id: &str, name: &str) -> String {
    format!("{repo_id}{REMOTE_MARKER}{name}")
}

/// Remote name encoded in a remote node IRI.
///
/// Nodes written by other tools may lack the marker; the text after the last
/// `:` is used then.
pub fn remote_name(node: &str) -> Option<&str> {
    let name = match node.rsplit_once(REMOTE_MARKER) {
        Some((_, name)) => name,
        None => node.rsplit_once(':')?.1,
    };
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_names() {
        assert_eq!(remote_name("path:a#remote:origin"), Some("origin"));
        assert_eq!(remote_name(&remote_node("urn:relpath:x/y", "up")), Some("up"));
        assert_eq!(remote_name("path:a#remote:"), None);
        assert_eq!(remote_name("nocolon"), None);
    }

    #[test]
    fn legacy_iris_are_accepted() {
        let [current, legacy] = Vocab::Push.read_iris();
        assert_eq!(current, "https://toelpel/push");
        assert_eq!(legacy, "https://git-watch/push");
    }
}
