use super::chunking::{chunk_padded, group_count};
use super::SheetNames;
use crate::tools::{Direction, SheetTool};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The sheets written for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSheets {
    /// One strip per group, in group order
    pub partials: Vec<PathBuf>,
    /// All strips stacked; `None` when there were no cards
    pub full: Option<PathBuf>,
}

/// Assemble `cards` into strips of `chunk_size` and stack the strips into a
/// full sheet.
///
/// The last strip is padded out with `filler`. With no cards at all nothing is
/// written.
pub fn pack(
    tool: &dyn SheetTool,
    cards: &[PathBuf],
    filler: &Path,
    chunk_size: usize,
    names: &SheetNames,
) -> Result<PackedSheets> {
    log::info!(
        "Packing {} cards into {} strips for {}",
        cards.len(),
        group_count(cards.len(), chunk_size),
        names.name()
    );
    let groups = chunk_padded(cards, chunk_size, &filler.to_path_buf());

    let mut partials = Vec::with_capacity(groups.len());
    for (index, group) in groups.iter().enumerate() {
        let out = names.partial(index);
        log::debug!("sheet {} <- {:?}", out.display(), group);
        tool.append(group, Direction::Horizontal, &out)
            .with_context(|| format!("Failed to assemble partial sheet {}", out.display()))?;
        partials.push(out);
    }

    if partials.is_empty() {
        log::warn!("No cards for {}, skipping sprite sheets", names.name());
        return Ok(PackedSheets {
            partials,
            full: None,
        });
    }

    let full = names.full();
    tool.append(&partials, Direction::Vertical, &full)
        .with_context(|| format!("Failed to assemble full sheet {}", full.display()))?;

    Ok(PackedSheets {
        partials,
        full: Some(full),
    })
}
