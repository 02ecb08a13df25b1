use super::{PageSpec, SheetNames};
use crate::tools::SheetTool;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Rotate every partial sheet and lay the results onto print pages.
///
/// Rotation finishes for all sheets before pagination starts, and the sheets
/// keep their group order throughout. Returns the written document, or `None`
/// when there were no sheets to print.
pub fn paginate(
    tool: &dyn SheetTool,
    partials: &[PathBuf],
    page: &PageSpec,
    names: &SheetNames,
) -> Result<Option<PathBuf>> {
    if partials.is_empty() {
        log::warn!("No sheets for {}, skipping page document", names.name());
        return Ok(None);
    }

    let rotated = tool
        .rotate(partials, page.rotation, &names.rotated_pattern())
        .with_context(|| format!("Failed to rotate sheets for {}", names.name()))?;

    let document = names.document();
    tool.paginate(&rotated, page, &document)
        .with_context(|| format!("Failed to paginate {}", document.display()))?;

    Ok(Some(document))
}
