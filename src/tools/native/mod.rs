//! In-process backend built on the `image`, `qrcode`, and `pdf-writer` crates.

mod pdf;

use super::{expand_pattern, Direction, SheetTool, SymbolEncoder};
use crate::sheets::PageSpec;
use anyhow::{bail, Context, Result};
use image::{imageops, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use std::path::{Path, PathBuf};

/// Code symbols rendered with the `qrcode` crate.
///
/// Uses the same error correction level, module size, and quiet zone as
/// `qrencode -m <margin> -s <scale>`.
pub struct QrEncoder {
    /// Quiet zone width, in modules
    pub margin: u32,
    /// Module size, in pixels
    pub scale: u32,
}

impl QrEncoder {
    pub fn render(&self, tag: &str) -> Result<RgbaImage> {
        let code = QrCode::with_error_correction_level(tag.as_bytes(), EcLevel::L)
            .with_context(|| format!("Failed to encode `{tag}` as a QR code"))?;
        let symbol = code
            .render::<Rgba<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.scale, self.scale)
            .build();

        let border = self.margin * self.scale;
        let mut image = RgbaImage::from_pixel(
            symbol.width() + border * 2,
            symbol.height() + border * 2,
            Rgba([255, 255, 255, 255]),
        );
        imageops::replace(&mut image, &symbol, border as i64, border as i64);
        Ok(image)
    }
}

impl SymbolEncoder for QrEncoder {
    fn encode(&self, tag: &str, out: &Path) -> Result<RgbaImage> {
        let image = self.render(tag)?;
        image
            .save(out)
            .with_context(|| format!("Failed to write code symbol {}", out.display()))?;
        Ok(image)
    }
}

/// Sheet assembly with the `image` crate, paginated with `pdf-writer`.
pub struct ImageSheets {
    /// Pixel density used to size sheets on the page
    pub print_dpi: f32,
}

fn load(path: &Path) -> Result<RgbaImage> {
    let image =
        image::open(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn save(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to write image {}", path.display()))
}

/// Join images edge to edge, top-aligned or left-aligned.
///
/// Any space left by images of differing sizes stays transparent.
pub fn append_images(images: &[RgbaImage], direction: Direction) -> RgbaImage {
    let (width, height): (u32, u32) = match direction {
        Direction::Horizontal => (
            images.iter().map(RgbaImage::width).sum(),
            images.iter().map(RgbaImage::height).max().unwrap_or(0),
        ),
        Direction::Vertical => (
            images.iter().map(RgbaImage::width).max().unwrap_or(0),
            images.iter().map(RgbaImage::height).sum(),
        ),
    };

    let mut canvas = RgbaImage::new(width, height);
    let mut cursor: i64 = 0;
    for image in images {
        match direction {
            Direction::Horizontal => {
                imageops::replace(&mut canvas, image, cursor, 0);
                cursor += image.width() as i64;
            }
            Direction::Vertical => {
                imageops::replace(&mut canvas, image, 0, cursor);
                cursor += image.height() as i64;
            }
        }
    }
    canvas
}

/// Rotate clockwise by a multiple of 90 degrees.
pub fn rotate_image(image: &RgbaImage, degrees: u32) -> Result<RgbaImage> {
    Ok(match degrees % 360 {
        0 => image.clone(),
        90 => imageops::rotate90(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate270(image),
        _ => bail!("Can only rotate by multiples of 90 degrees, not {degrees}"),
    })
}

impl SheetTool for ImageSheets {
    fn append(&self, inputs: &[PathBuf], direction: Direction, out: &Path) -> Result<()> {
        if inputs.is_empty() {
            bail!("Nothing to append into {}", out.display());
        }
        let images = inputs
            .iter()
            .map(|p| load(p))
            .collect::<Result<Vec<_>>>()?;
        save(&append_images(&images, direction), out)
    }

    fn rotate(&self, inputs: &[PathBuf], degrees: u32, pattern: &Path) -> Result<Vec<PathBuf>> {
        inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let out = expand_pattern(pattern, i);
                let rotated = rotate_image(&load(input)?, degrees)
                    .with_context(|| format!("Failed to rotate {}", input.display()))?;
                save(&rotated, &out)?;
                Ok(out)
            })
            .collect()
    }

    fn paginate(&self, inputs: &[PathBuf], page: &PageSpec, out: &Path) -> Result<()> {
        let sheets = inputs
            .iter()
            .map(|p| load(p))
            .collect::<Result<Vec<_>>>()?;
        let bytes = pdf::render_pages(&sheets, page, self.print_dpi);
        std::fs::write(out, bytes)
            .with_context(|| format!("Failed to write page document {}", out.display()))
    }
}
