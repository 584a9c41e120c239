//! User configuration
//!
//! ```toml
//! [git]
//! binary = "git"
//! timeout_secs = 30
//!
//! [scan]
//! concurrency = 8
//! index_name = "workspaces.ttl"
//! skip_hidden = true
//! ```
//!
//! Every field is optional. The file is looked up at an explicit location
//! (the CLI's `--config`, which also reads `$ATLAS_CONFIG`) or else at
//! [`default_path`]; with neither, built-in defaults apply.

use std::path::{Path, PathBuf};
use std::time::Duration;

use atlas_fs::{ConfigStore, NormalizedPath, WorkspacePath};
use atlas_git::GitRunner;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::pool;

fn default_binary() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    atlas_git::command::DEFAULT_TIMEOUT.as_secs()
}

fn default_index_name() -> String {
    WorkspacePath::DefaultIndex.as_str().to_string()
}

fn default_skip_hidden() -> bool {
    true
}

/// How git is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSection {
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Per-invocation timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Discovery and probing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSection {
    /// Concurrent probes; the number of available cores when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Catalog file name searched for and created
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Skip directories whose name starts with a dot
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            concurrency: None,
            index_name: default_index_name(),
            skip_hidden: default_skip_hidden(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub git: GitSection,

    #[serde(default)]
    pub scan: ScanSection,
}

impl AtlasConfig {
    /// Load a config file. Format is chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else [`default_path`] if it
    /// exists, else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// A git runner honouring the `[git]` section.
    pub fn runner(&self) -> GitRunner {
        GitRunner::new(&self.git.binary, Duration::from_secs(self.git.timeout_secs))
    }

    /// Number of probes allowed to run at once.
    pub fn concurrency(&self) -> usize {
        self.scan
            .concurrency
            .unwrap_or_else(pool::default_concurrency)
            .max(1)
    }
}

/// `<config dir>/repo-atlas/config.toml`, when the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repo-atlas").join("config.toml"))
}
