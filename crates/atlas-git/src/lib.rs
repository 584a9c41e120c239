//! Git layer for Repository Atlas
//!
//! Everything here shells out to the `git` executable through [`GitRunner`].
//! [`GitProbe`] answers questions about one working directory; queries
//! degrade to empty or zero answers on failure, while the mutating
//! operations ([`GitProbe::clone`], [`GitProbe::setup`]) report errors.

pub mod command;
pub mod error;
pub mod lifecycle;
pub mod probe;
pub mod remote;
pub mod snapshot;

pub use command::{GitOutput, GitRunner};
pub use error::{Error, Result};
pub use lifecycle::{CloneOutcome, RepoLifecycle};
pub use probe::GitProbe;
pub use remote::{Direction, Remote, RemoteSet};
pub use snapshot::{BranchState, ProbeSnapshot};
