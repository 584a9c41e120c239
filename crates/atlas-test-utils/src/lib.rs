//! Shared test utilities for the repository-atlas workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures, from a bare `.git` marker up to
//!   diverged clones of a shared bare remote
//! - [`workspace`]: [`workspace::TestWorkspace`], a temporary workspace root
//!   holding several repositories and an index file

pub mod git;
pub mod workspace;
