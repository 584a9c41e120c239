//! Index file discovery
//!
//! The lookup never fails: an unreadable or missing file simply means "not
//! found" and the caller decides what that implies.

use std::path::{Path, PathBuf};

/// Look for `name` in `start` and then in each of its ancestors.
///
/// A relative `start` is resolved against the current directory first.
pub fn find_index(start: &Path, name: &str) -> Option<PathBuf> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(start)
    };

    for dir in start.ancestors() {
        let candidate = dir.join(name);
        if candidate.is_file() {
            tracing::debug!(index = %candidate.display(), "Found index");
            return Some(candidate);
        }
    }

    tracing::debug!(start = %start.display(), name, "Reached filesystem root without finding an index");
    None
}
