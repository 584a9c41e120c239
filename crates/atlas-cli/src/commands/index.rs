//! `index` and `scan` commands

use std::path::Path;

use atlas_core::{Atlas, ScanOptions};

use crate::error::Result;
use crate::render;

/// Run the index command
pub async fn run_index(atlas: &Atlas, cwd: &Path, root: &Path, index: Option<&Path>) -> Result<()> {
    let workspace = atlas.locate(Some(root), index, cwd)?;
    let report = atlas.index(&workspace).await?;
    print!("{}", render::scan_summary(&report, &workspace.root));
    Ok(())
}

/// Run the scan command
pub async fn run_scan(
    atlas: &Atlas,
    cwd: &Path,
    root: &Path,
    index: Option<&Path>,
    options: ScanOptions,
) -> Result<()> {
    let workspace = atlas.locate(Some(root), index, cwd)?;
    let report = atlas.scan(&workspace, options).await?;
    print!("{}", render::scan_summary(&report, &workspace.root));
    Ok(())
}
