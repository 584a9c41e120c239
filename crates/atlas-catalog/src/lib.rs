//! Catalog store for Repository Atlas
//!
//! The catalog is a small RDF graph persisted as Turtle. Repositories are
//! subjects named by base-relative identifiers (see [`atlas_fs::identifier`]),
//! so moving the workspace directory never invalidates the file.
//!
//! ```text
//! <path:space/simpsons> a atlas:repo ;
//!     atlas:remote <path:space/simpsons#remote:origin> .
//!
//! <path:space/simpsons#remote:origin> atlas:fetch <https://...> ;
//!     atlas:push <https://...> .
//! ```

pub mod error;
pub mod graph;
pub mod store;
pub mod turtle;
pub mod vocab;

pub use error::{Error, Result};
pub use graph::{Graph, Literal, Term, Triple};
pub use store::{Catalog, Handle, RejectedEntry, RepositoryEntry, UpsertReport};
