//! Remote declarations and their normalization.

use std::collections::BTreeMap;

use serde::Serialize;

/// Remote name to remote, ordered by name.
pub type RemoteSet = BTreeMap<String, Remote>;

/// Direction a remote URL is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Fetch,
    Push,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Fetch, Direction::Push];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Push => "push",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fetch" => Some(Self::Fetch),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote with both URL directions filled in.
///
/// Construct through [`Remote::from_directions`] so that a record with a
/// single direction always gets the other one defaulted to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Remote {
    pub fetch: String,
    pub push: String,
}

impl Remote {
    /// Normalize an optional pair of URLs.
    ///
    /// A missing direction takes the other one's URL. Returns `None` when
    /// neither direction is present.
    pub fn from_directions(fetch: Option<String>, push: Option<String>) -> Option<Self> {
        match (fetch, push) {
            (Some(fetch), Some(push)) => Some(Self { fetch, push }),
            (Some(url), None) | (None, Some(url)) => Some(Self::single(url)),
            (None, None) => None,
        }
    }

    /// A remote using `url` for both directions.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            fetch: url.clone(),
            push: url,
        }
    }

    /// Fetch and push point at different URLs.
    pub fn is_mirrored(&self) -> bool {
        self.fetch != self.push
    }

    pub fn url(&self, direction: Direction) -> &str {
        match direction {
            Direction::Fetch => &self.fetch,
            Direction::Push => &self.push,
        }
    }
}

/// Collects `(name, direction, url)` observations into a [`RemoteSet`].
#[derive(Debug, Default)]
pub struct RemoteSetBuilder {
    partial: BTreeMap<String, (Option<String>, Option<String>)>,
}

impl RemoteSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one URL. A later URL for the same name and direction wins.
    pub fn add(&mut self, name: impl Into<String>, direction: Direction, url: impl Into<String>) {
        let entry = self.partial.entry(name.into()).or_default();
        match direction {
            Direction::Fetch => entry.0 = Some(url.into()),
            Direction::Push => entry.1 = Some(url.into()),
        }
    }

    /// Make sure `name` appears even if no URL is ever recorded for it.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.partial.entry(name.into()).or_default();
    }

    /// Finish, dropping names that never received a URL.
    pub fn build(self) -> RemoteSet {
        self.partial
            .into_iter()
            .filter_map(|(name, (fetch, push))| {
                let remote = Remote::from_directions(fetch, push);
                if remote.is_none() {
                    tracing::debug!(remote = %name, "Dropping remote without any URL");
                }
                remote.map(|remote| (name, remote))
            })
            .collect()
    }
}

/// Parse the output of `git remote -v`.
///
/// Each line reads `<name>\t<url> (<direction>)`. URLs may contain spaces,
/// so only the first and the last field are split off.
pub fn parse_remote_verbose(stdout: &str) -> RemoteSet {
    let mut builder = RemoteSetBuilder::new();
    for line in stdout.lines() {
        let line = line.trim();
        let Some((name, rest)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let Some((url, direction)) = rest.trim().rsplit_once(char::is_whitespace) else {
            continue;
        };
        let direction = direction.trim_start_matches('(').trim_end_matches(')');
        match Direction::parse(direction) {
            Some(direction) => builder.add(name, direction, url.trim()),
            None => tracing::debug!(line, "Unrecognized `git remote -v` line"),
        }
    }
    builder.build()
}
