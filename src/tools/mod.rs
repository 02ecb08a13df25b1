//! Image tools the deck pipeline drives.
//!
//! Generating code symbols and assembling, rotating, and paginating sheets are
//! each a single blocking call behind a narrow trait. Two backends implement
//! them: [`native`] does everything in-process, [`magick`] shells out to
//! `qrencode` and ImageMagick's `convert`. Both read and write image files at
//! paths chosen by the caller.

use crate::sheets::PageSpec;
use anyhow::{anyhow, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

pub mod magick;
pub mod native;

/// Turns a tag into a scannable code symbol.
pub trait SymbolEncoder {
    /// Encode `tag`, writing the symbol as a PNG at `out` and returning it.
    fn encode(&self, tag: &str, out: &Path) -> Result<RgbaImage>;
}

/// Which way images are joined by [`SheetTool::append`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// Assembles card images into sheets and sheets into print documents.
pub trait SheetTool {
    /// Join `inputs`, in order, into a single image at `out`.
    fn append(&self, inputs: &[PathBuf], direction: Direction, out: &Path) -> Result<()>;

    /// Rotate each input clockwise by `degrees`.
    ///
    /// Input `i` is written to `pattern` with `%d` replaced by `i`; the written
    /// paths are returned in input order.
    fn rotate(&self, inputs: &[PathBuf], degrees: u32, pattern: &Path) -> Result<Vec<PathBuf>>;

    /// Lay `inputs`, in order, onto the pages of a single PDF at `out`.
    fn paginate(&self, inputs: &[PathBuf], page: &PageSpec, out: &Path) -> Result<()>;
}

/// Substitute `index` for the `%d` placeholder in `pattern`.
pub fn expand_pattern(pattern: &Path, index: usize) -> PathBuf {
    PathBuf::from(
        pattern
            .to_string_lossy()
            .replacen("%d", &index.to_string(), 1),
    )
}

/// Fail unless a tool actually produced `path`.
pub fn ensure_output(tool: &str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(anyhow!(
            "`{tool}` reported success but {} was not written",
            path.display()
        ))
    }
}
