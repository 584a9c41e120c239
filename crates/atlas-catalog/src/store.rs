//! The persistent catalog.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use atlas_fs::identifier::{self, IdentifierScheme};
use atlas_fs::{NormalizedPath, RobustnessConfig, io};
use atlas_git::remote::RemoteSetBuilder;
use atlas_git::{Direction, RemoteSet};
use serde::Serialize;

use crate::graph::{Graph, Term, Triple};
use crate::vocab::{self, RDF_TYPE, Vocab};
use crate::{Error, Result, turtle};

/// A cataloged repository resolved against the current base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle {
    /// Absolute location under the base directory.
    pub path: PathBuf,
    /// Location relative to the base directory.
    pub relative: NormalizedPath,
}

impl Handle {
    /// Identifier under the current scheme.
    pub fn identifier(&self) -> String {
        IdentifierScheme::CURRENT.identify(&self.relative)
    }
}

/// Input to [`Catalog::upsert_all`]: a repository and its remotes.
#[derive(Debug, Clone)]
pub struct RepositoryEntry {
    pub path: PathBuf,
    pub remotes: RemoteSet,
}

impl RepositoryEntry {
    pub fn new(path: impl Into<PathBuf>, remotes: RemoteSet) -> Self {
        Self {
            path: path.into(),
            remotes,
        }
    }
}

/// An entry skipped by [`Catalog::upsert_all`].
#[derive(Debug)]
pub struct RejectedEntry {
    pub path: PathBuf,
    pub error: atlas_fs::Error,
}

/// What [`Catalog::upsert_all`] did.
#[derive(Debug, Default)]
pub struct UpsertReport {
    /// Relative paths that were written, in input order.
    pub written: Vec<NormalizedPath>,
    pub rejected: Vec<RejectedEntry>,
}

/// Repository records backed by a Turtle file.
///
/// The graph is held in memory; every [`upsert_all`](Catalog::upsert_all)
/// rewrites the whole file atomically.
#[derive(Debug)]
pub struct Catalog {
    index: PathBuf,
    base: PathBuf,
    graph: Graph,
    robustness: RobustnessConfig,
}

impl Catalog {
    /// Load `index` (or start empty if it does not exist) with identifiers
    /// interpreted relative to `base`.
    pub fn open(index: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Result<Self> {
        let index = index.into();
        let base = base.into();

        let graph = if index.is_file() {
            let bytes = io::read_bytes(&NormalizedPath::new(&index))?;
            let content = String::from_utf8(bytes).map_err(|e| {
                let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
                Error::CatalogParse {
                    path: index.clone(),
                    line: 1 + valid.iter().filter(|b| **b == b'\n').count(),
                    message: format!("invalid UTF-8 after byte {}", valid.len()),
                }
            })?;
            turtle::parse(&content).map_err(|e| Error::CatalogParse {
                path: index.clone(),
                line: e.line,
                message: e.message,
            })?
        } else {
            tracing::debug!(index = %index.display(), "Index does not exist yet, starting empty");
            Graph::new()
        };

        tracing::debug!(
            index = %index.display(),
            base = %base.display(),
            triples = graph.len(),
            "Opened catalog"
        );
        Ok(Self {
            index,
            base,
            graph,
            robustness: RobustnessConfig::default(),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn index_path(&self) -> &Path {
        &self.index
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Record every entry, then write the catalog file once.
    ///
    /// Entries outside the base are reported in [`UpsertReport::rejected`]
    /// and do not stop the others. Upserting the same entries twice leaves
    /// the file unchanged.
    pub fn upsert_all(&mut self, entries: &[RepositoryEntry]) -> Result<UpsertReport> {
        let mut report = UpsertReport::default();

        for entry in entries {
            match identifier::relative_path(&self.base, &entry.path) {
                Ok(relative) => {
                    self.upsert_one(&relative, &entry.remotes);
                    report.written.push(relative);
                }
                Err(error) if error.is_path_error() => {
                    tracing::warn!(path = %entry.path.display(), error = %error, "Skipping repository");
                    report.rejected.push(RejectedEntry {
                        path: entry.path.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error.into()),
            }
        }

        self.save()?;
        tracing::info!(
            index = %self.index.display(),
            written = report.written.len(),
            rejected = report.rejected.len(),
            "Catalog written"
        );
        Ok(report)
    }

    fn upsert_one(&mut self, relative: &NormalizedPath, remotes: &RemoteSet) {
        for scheme in IdentifierScheme::DECODE_ORDER {
            self.remove_repository(&scheme.identify(relative));
        }

        let id = IdentifierScheme::CURRENT.identify(relative);
        self.graph
            .insert(Triple::new(&id, RDF_TYPE, Term::Iri(Vocab::Repo.iri())));

        for (name, remote) in remotes {
            let node = vocab::remote_node(&id, name);
            self.graph
                .insert(Triple::new(&id, Vocab::Remote.iri(), Term::Iri(node.clone())));
            for direction in Direction::ALL {
                self.graph.insert(Triple::new(
                    &node,
                    Vocab::from(direction).iri(),
                    Term::Iri(remote.url(direction).to_string()),
                ));
            }
        }
    }

    /// Drop a repository record and every remote record it owns.
    fn remove_repository(&mut self, id: &str) {
        let mut nodes: BTreeSet<String> = Vocab::Remote
            .read_iris()
            .iter()
            .flat_map(|predicate| self.graph.objects(id, predicate))
            .filter_map(|object| object.as_iri().map(str::to_string))
            .collect();
        let owned_prefix = format!("{id}{}", vocab::REMOTE_MARKER);
        nodes.extend(
            self.graph
                .iter()
                .filter(|t| t.subject.starts_with(&owned_prefix))
                .map(|t| t.subject.clone()),
        );

        let mut removed = self.graph.remove_subject(id);
        for node in &nodes {
            removed += self.graph.remove_subject(node);
        }
        if removed > 0 {
            tracing::debug!(id, removed, "Replaced existing record");
        }
    }

    /// Write the graph to the index file.
    pub fn save(&self) -> Result<()> {
        let text = self.to_turtle();
        io::write_atomic(&NormalizedPath::new(&self.index), text.as_bytes(), self.robustness)?;
        Ok(())
    }

    /// The catalog as it would be written to disk.
    pub fn to_turtle(&self) -> String {
        turtle::write(&self.graph, &[(vocab::PREFIX, vocab::NAMESPACE)])
    }

    /// All cataloged repositories, sorted by relative path.
    ///
    /// Records whose identifier cannot be decoded, or that would resolve
    /// outside the base, are skipped with a warning.
    pub fn list_handles(&self) -> Vec<Handle> {
        let mut handles = BTreeSet::new();
        for class in Vocab::Repo.read_iris() {
            let class = Term::Iri(class);
            for id in self.graph.subjects(RDF_TYPE, &class) {
                match identifier::decode(id) {
                    Ok(relative) => {
                        let path = self.base.join(relative.to_native());
                        if !NormalizedPath::new(&path).starts_with(&NormalizedPath::new(&self.base)) {
                            tracing::warn!(id, "Ignoring record that resolves outside the base");
                            continue;
                        }
                        handles.insert(Handle { path, relative });
                    }
                    Err(e) => tracing::warn!(id, error = %e, "Ignoring record with undecodable identifier"),
                }
            }
        }
        handles.into_iter().collect()
    }

    /// Absolute paths of all cataloged repositories, for plain output.
    pub fn list_display_strings(&self) -> Vec<String> {
        self.list_handles()
            .into_iter()
            .map(|handle| handle.path.display().to_string())
            .collect()
    }

    /// Cataloged repositories located at or below `dir`.
    ///
    /// When `dir` is the base or one of its ancestors, everything is returned.
    pub fn list_handles_under(&self, dir: &Path) -> Vec<Handle> {
        if is_same_or_ancestor(dir, &self.base) {
            return self.list_handles();
        }
        match identifier::relative_path(&self.base, dir) {
            Ok(scope) => self
                .list_handles()
                .into_iter()
                .filter(|handle| handle.relative.starts_with(&scope))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Look up a repository by its path relative to the base.
    pub fn find(&self, relative: impl AsRef<Path>) -> Option<Handle> {
        let relative = NormalizedPath::new(relative);
        self.list_handles()
            .into_iter()
            .find(|handle| handle.relative == relative)
    }

    /// Number of cataloged repositories.
    pub fn len(&self) -> usize {
        self.list_handles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remotes recorded for `handle`, under either identifier scheme.
    ///
    /// A remote missing one direction gets the other one's URL; a remote
    /// with neither is left out. URLs that are themselves path identifiers
    /// are resolved against the base.
    pub fn remotes_for(&self, handle: &Handle) -> RemoteSet {
        let mut builder = RemoteSetBuilder::new();

        // Legacy first so that current records win
        for scheme in IdentifierScheme::DECODE_ORDER.iter().rev() {
            let id = scheme.identify(&handle.relative);
            for predicate in Vocab::Remote.read_iris() {
                for node in self.graph.objects(&id, &predicate) {
                    let node = node.as_str();
                    let Some(name) = vocab::remote_name(node) else {
                        tracing::debug!(node, "Remote node without a name");
                        continue;
                    };
                    builder.declare(name);
                    for direction in Direction::ALL {
                        for predicate in Vocab::from(direction).read_iris() {
                            if let Some(url) = self.graph.value(node, &predicate) {
                                builder.add(name, direction, self.resolve_url(url.as_str()));
                            }
                        }
                    }
                }
            }
        }

        builder.build()
    }

    fn resolve_url(&self, url: &str) -> String {
        match identifier::decode(url) {
            Ok(relative) => self.base.join(relative.to_native()).display().to_string(),
            Err(_) => url.to_string(),
        }
    }
}

fn is_same_or_ancestor(dir: &Path, base: &Path) -> bool {
    if NormalizedPath::new(base).starts_with(&NormalizedPath::new(dir)) {
        return true;
    }
    match (dunce::canonicalize(dir), dunce::canonicalize(base)) {
        (Ok(dir), Ok(base)) => base.starts_with(dir),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_git::Remote;

    fn catalog_at(base: &str) -> Catalog {
        Catalog {
            index: PathBuf::from(base).join("workspaces.ttl"),
            base: PathBuf::from(base),
            graph: Graph::new(),
            robustness: RobustnessConfig::default(),
        }
    }

    #[test]
    fn upsert_one_replaces_remotes_wholesale() {
        let mut catalog = catalog_at("/ws");
        let rel = NormalizedPath::new("a");
        let mut first = RemoteSet::new();
        first.insert("origin".into(), Remote::single("https://one"));
        first.insert("old".into(), Remote::single("https://old"));
        catalog.upsert_one(&rel, &first);

        let mut second = RemoteSet::new();
        second.insert("origin".into(), Remote::single("https://two"));
        catalog.upsert_one(&rel, &second);

        let handle = catalog.find("a").unwrap();
        assert_eq!(catalog.remotes_for(&handle), second);
        // type + remote link + fetch + push
        assert_eq!(catalog.graph().len(), 4);
    }

    #[test]
    fn upsert_one_migrates_legacy_identifier() {
        let mut catalog = catalog_at("/ws");
        catalog.graph.insert(Triple::new(
            "urn:relpath:a",
            RDF_TYPE,
            Term::Iri(Vocab::Repo.iri()),
        ));
        catalog.upsert_one(&NormalizedPath::new("a"), &RemoteSet::new());

        let subjects: Vec<_> = catalog.graph().iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(subjects, vec!["path:a"]);
    }

    #[test]
    fn path_urls_resolve_against_base() {
        let catalog = catalog_at("/ws");
        assert_eq!(catalog.resolve_url("path:remotes/a.git"), "/ws/remotes/a.git");
        assert_eq!(catalog.resolve_url("https://x/a.git"), "https://x/a.git");
    }
}
