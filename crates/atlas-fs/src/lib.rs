//! Filesystem layer for Repository Atlas
//!
//! Provides normalized path handling, the base-relative path identifier codec
//! used by the catalog, atomic file replacement, config file loading and
//! discovery of the workspace index file.

pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod identifier;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::WorkspacePath;
pub use discovery::find_index;
pub use error::{Error, Result};
pub use identifier::{IdentifierScheme, decode, encode, encode_with};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
