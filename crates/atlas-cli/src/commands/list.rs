//! `list` command

use std::path::Path;

use atlas_core::Atlas;

use crate::error::Result;
use crate::render;

/// How `list` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Table,
    Json,
    /// One absolute path per line, without querying git.
    Plain,
}

/// Run the list command
pub async fn run_list(
    atlas: &Atlas,
    cwd: &Path,
    root: Option<&Path>,
    index: Option<&Path>,
    format: ListFormat,
) -> Result<()> {
    let workspace = atlas.locate(root, index, cwd)?;

    match format {
        ListFormat::Plain => {
            for line in atlas.list_plain(&workspace, Some(cwd))? {
                println!("{line}");
            }
        }
        ListFormat::Json => {
            let listed = atlas.list(&workspace, Some(cwd)).await?;
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        ListFormat::Table => {
            let listed = atlas.list(&workspace, Some(cwd)).await?;
            print!("{}", render::status_table(&listed));
        }
    }
    Ok(())
}
