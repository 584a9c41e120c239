//! Materialization states of a cataloged repository.

use serde::Serialize;

/// Result of a successful [`crate::GitProbe::clone`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CloneOutcome {
    Cloned { remote: String },
    /// The directory already is a repository; nothing was done.
    AlreadyPresent,
    /// The chosen remote fetches and pushes to different URLs.
    SkippedMirrored { remote: String },
}

/// Where a cataloged repository stands during `clone`.
///
/// ```text
/// Unmaterialized --clone--> Cloned --setup--> Configured
///        \                    \
///         +------------------- +--> Failed (terminal)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum RepoLifecycle {
    Unmaterialized,
    Cloned,
    Configured,
    Failed(String),
}

impl RepoLifecycle {
    /// Whether no further transition will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Configured | Self::Failed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Move to `Failed`, unless already terminal.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.is_terminal() {
            *self = Self::Failed(reason.into());
        }
    }

    /// Record that the directory now holds a working copy.
    ///
    /// Every [`CloneOutcome`] leads here: a skipped mirrored clone still
    /// leaves an existing directory that can be set up.
    pub fn cloned(&mut self) {
        if *self == Self::Unmaterialized {
            *self = Self::Cloned;
        }
    }

    /// Mark remote registration as done.
    pub fn configured(&mut self) {
        if *self == Self::Cloned {
            *self = Self::Configured;
        }
    }
}

impl std::fmt::Display for RepoLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmaterialized => f.write_str("unmaterialized"),
            Self::Cloned => f.write_str("cloned"),
            Self::Configured => f.write_str("configured"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_is_sticky() {
        let mut state = RepoLifecycle::Unmaterialized;
        state.fail("no remote");
        state.cloned();
        state.configured();
        assert_eq!(state, RepoLifecycle::Failed("no remote".into()));
    }

    #[test]
    fn happy_path_reaches_configured() {
        let mut state = RepoLifecycle::Unmaterialized;
        state.cloned();
        assert_eq!(state, RepoLifecycle::Cloned);
        state.configured();
        assert!(state.is_terminal());
        state.fail("late");
        assert_eq!(state, RepoLifecycle::Configured);
    }
}
