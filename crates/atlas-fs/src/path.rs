//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path normalized to use forward slashes internally.
///
/// Besides converting backslashes, construction lexically cleans the path:
/// empty and `.` segments are dropped and `..` is resolved against the
/// preceding segment where possible. A leading `//` (network share) is kept.
/// The filesystem is never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: clean(&raw) }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.components()
            .next_back()
            .filter(|name| *name != "..")
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Path segments, excluding the root marker.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.inner
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
    }

    /// Whether the path is rooted (`/...`, `//server/...` or a drive letter).
    pub fn is_absolute(&self) -> bool {
        let bytes = self.inner.as_bytes();
        self.inner.starts_with('/')
            || (bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic())
    }

    /// Express this path relative to `base`.
    ///
    /// Returns `None` unless `self` equals `base` or lies below it. An equal
    /// path yields `.`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        let mine: Vec<&str> = self.components().collect();
        let theirs: Vec<&str> = base.components().collect();
        if mine.len() < theirs.len() || mine[..theirs.len()] != theirs[..] {
            return None;
        }
        let rest = &mine[theirs.len()..];
        if rest.contains(&"..") {
            return None;
        }
        if rest.is_empty() {
            Some(Self::new("."))
        } else {
            Some(Self {
                inner: rest.join("/"),
            })
        }
    }

    /// Whether `self` is `base` or lies below it.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        self.relative_to(base).is_some()
    }
}

fn clean(raw: &str) -> String {
    let (prefix, rest) = if raw.starts_with("//") && !raw.starts_with("///") {
        ("//", &raw[2..])
    } else if raw.starts_with('/') {
        ("/", raw.trim_start_matches('/'))
    } else {
        ("", raw)
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                // `..` above the root stays at the root
                _ if !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return if prefix.is_empty() {
            ".".to_string()
        } else {
            prefix.to_string()
        };
    }
    format!("{}{}", prefix, parts.join("/"))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<NormalizedPath> for String {
    fn from(p: NormalizedPath) -> Self {
        p.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_resolves_dot_segments() {
        assert_eq!(NormalizedPath::new("a/./b/../c").as_str(), "a/c");
        assert_eq!(NormalizedPath::new("/a/../../b").as_str(), "/b");
        assert_eq!(NormalizedPath::new("../a").as_str(), "../a");
        assert_eq!(NormalizedPath::new("").as_str(), ".");
    }

    #[test]
    fn relative_to_rejects_siblings() {
        let base = NormalizedPath::new("/work/space");
        assert!(NormalizedPath::new("/work/spaces/x").relative_to(&base).is_none());
        assert_eq!(
            NormalizedPath::new("/work/space/x/y")
                .relative_to(&base)
                .unwrap()
                .as_str(),
            "x/y"
        );
    }
}
