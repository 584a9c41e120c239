//! Command implementations for atlas-cli

pub mod clone;
pub mod index;
pub mod list;

pub use clone::run_clone;
pub use index::{run_index, run_scan};
pub use list::{ListFormat, run_list};
