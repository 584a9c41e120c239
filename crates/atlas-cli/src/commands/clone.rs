//! `clone` command

use std::path::Path;

use atlas_core::{Atlas, CloneSelection};
use atlas_fs::NormalizedPath;

use crate::error::{CliError, Result};
use crate::render;

/// Run the clone command
///
/// REPOSITORY, when given, wins over `--all`. Repositories that fail to
/// clone are reported in the summary; they do not fail the command.
pub async fn run_clone(
    atlas: &Atlas,
    cwd: &Path,
    repository: Option<&Path>,
    all: bool,
    root: Option<&Path>,
    index: Option<&Path>,
) -> Result<()> {
    let selection = match (repository, all) {
        (Some(repository), _) => CloneSelection::One(NormalizedPath::new(cwd.join(repository)).to_native()),
        (None, true) => CloneSelection::All,
        (None, false) => {
            return Err(CliError::usage(
                "specify a REPOSITORY, or pass --all to clone every repository in the index",
            ));
        }
    };

    let workspace = atlas.locate(root, index, cwd)?;
    let report = atlas.clone(&workspace, selection).await?;
    print!("{}", render::clone_summary(&report));
    Ok(())
}
