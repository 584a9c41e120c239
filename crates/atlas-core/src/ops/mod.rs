//! The workflows behind the CLI subcommands.
//!
//! Every workflow probes repositories through a [`ProbePool`] and collects
//! the results in memory; the catalog is written at most once, at the end.
//! A cancelled workflow therefore leaves the catalog untouched.

mod clone;
mod list;
mod scan;

use std::path::{Path, PathBuf};

use atlas_git::GitProbe;
use tokio_util::sync::CancellationToken;

use crate::workspace::{self, Workspace};
use crate::{AtlasConfig, ProbePool, Result};

pub use clone::{CloneReport, CloneSelection, ClonedRepository};
pub use list::RepositoryStatus;
pub use scan::{ScanOptions, ScanReport};

/// Entry point for the workflows, carrying configuration and cancellation.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    config: AtlasConfig,
    cancel: CancellationToken,
}

impl Atlas {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Share `token` with the caller; cancelling it stops every workflow.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// [`workspace::locate`] with the configured index name.
    pub fn locate(&self, root: Option<&Path>, index: Option<&Path>, cwd: &Path) -> Result<Workspace> {
        workspace::locate(root, index, cwd, &self.config.scan.index_name)
    }

    fn pool(&self) -> ProbePool {
        ProbePool::new(self.config.concurrency()).with_cancellation(self.cancel.clone())
    }

    /// A factory for probes that can be moved into pool jobs.
    fn prober(&self, workspace: &Workspace) -> Prober {
        Prober {
            base: workspace.root.clone(),
            runner: self.config.runner(),
        }
    }
}

#[derive(Debug, Clone)]
struct Prober {
    base: PathBuf,
    runner: atlas_git::GitRunner,
}

impl Prober {
    fn probe(&self, path: impl Into<PathBuf>) -> GitProbe {
        GitProbe::new(path)
            .with_base(&self.base)
            .with_runner(self.runner.clone())
    }
}
