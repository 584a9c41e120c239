//! Status aggregation and workflows for Repository Atlas
//!
//! `atlas-core` sits between the CLI and the lower crates:
//!
//! ```text
//!                      atlas-cli
//!                          |
//!                      atlas-core
//!        (workspace, walk, pool, status, ops)
//!                          |
//!          +---------------+---------------+
//!          |               |               |
//!      atlas-fs        atlas-git     atlas-catalog
//! ```
//!
//! - **Workspace location**: find the root directory and catalog file
//! - **Walk**: discover candidate repositories below a root
//! - **Probe pool**: run git probes concurrently, with cancellation
//! - **Status**: classify a [`ProbeSnapshot`](atlas_git::ProbeSnapshot)
//! - **Ops**: the `index`, `scan`, `list` and `clone` workflows

pub mod config;
pub mod error;
pub mod ops;
pub mod pool;
pub mod status;
pub mod walk;
pub mod workspace;

pub use config::AtlasConfig;
pub use error::{Error, Result};
pub use ops::{
    Atlas, CloneReport, CloneSelection, ClonedRepository, RepositoryStatus, ScanOptions, ScanReport,
};
pub use pool::ProbePool;
pub use status::{BranchFlag, BranchStatus, RepoFlag, StatusRecord, classify};
pub use workspace::{Workspace, locate};
