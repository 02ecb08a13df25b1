//! Backend that runs `qrencode` and ImageMagick's `convert`.
//!
//! Each operation is exactly one process invocation; a non-zero exit or a
//! missing output file is an error carrying the command's stderr.

use super::{ensure_output, expand_pattern, Direction, SheetTool, SymbolEncoder};
use crate::sheets::PageSpec;
use anyhow::{bail, Context, Result};
use image::RgbaImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run `program` with `args` to completion.
fn run(program: &str, args: &[OsString]) -> Result<()> {
    log::debug!(
        "{program} {}",
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to launch `{program}`; is it installed?"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("`{program}` failed ({}): {}", output.status, stderr.trim());
    }
    Ok(())
}

/// Code symbols from the `qrencode` command line tool.
pub struct QrEncode {
    pub program: String,
    /// Quiet zone width, in modules
    pub margin: u32,
    /// Module size, in pixels
    pub scale: u32,
}

impl QrEncode {
    fn args(&self, tag: &str, out: &Path) -> Vec<OsString> {
        vec![
            "-m".into(),
            self.margin.to_string().into(),
            "-s".into(),
            self.scale.to_string().into(),
            "-o".into(),
            out.into(),
            tag.into(),
        ]
    }
}

impl SymbolEncoder for QrEncode {
    fn encode(&self, tag: &str, out: &Path) -> Result<RgbaImage> {
        run(&self.program, &self.args(tag, out))?;
        ensure_output(&self.program, out)?;
        let image = image::open(out)
            .with_context(|| format!("Failed to decode code symbol {}", out.display()))?;
        Ok(image.to_rgba8())
    }
}

/// Sheet assembly through ImageMagick's `convert`.
pub struct Convert {
    pub program: String,
}

impl Convert {
    fn append_args(inputs: &[PathBuf], direction: Direction, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = inputs.iter().map(OsString::from).collect();
        args.push(match direction {
            Direction::Horizontal => "+append".into(),
            Direction::Vertical => "-append".into(),
        });
        args.push(out.into());
        args
    }

    fn rotate_args(inputs: &[PathBuf], degrees: u32, pattern: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-rotate".into(), degrees.to_string().into()];
        args.extend(inputs.iter().map(OsString::from));
        args.push(pattern.into());
        args
    }

    fn paginate_args(inputs: &[PathBuf], page: &PageSpec, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-page".into(), page.geometry().into()];
        args.extend(inputs.iter().map(OsString::from));
        args.push(out.into());
        args
    }
}

impl SheetTool for Convert {
    fn append(&self, inputs: &[PathBuf], direction: Direction, out: &Path) -> Result<()> {
        run(&self.program, &Self::append_args(inputs, direction, out))?;
        ensure_output(&self.program, out)
    }

    fn rotate(&self, inputs: &[PathBuf], degrees: u32, pattern: &Path) -> Result<Vec<PathBuf>> {
        run(&self.program, &Self::rotate_args(inputs, degrees, pattern))?;

        // convert substitutes the scene number of each frame for %d
        (0..inputs.len())
            .map(|i| {
                let out = expand_pattern(pattern, i);
                ensure_output(&self.program, &out).map(|_| out)
            })
            .collect()
    }

    fn paginate(&self, inputs: &[PathBuf], page: &PageSpec, out: &Path) -> Result<()> {
        run(&self.program, &Self::paginate_args(inputs, page, out))?;
        ensure_output(&self.program, out)
    }
}
