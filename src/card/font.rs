//! Label text rasterization.
//!
//! The composer only decides what text goes where; drawing it is the job of a
//! [`TextRasterizer`]. [`FontRasterizer`] draws with a TrueType font parsed by
//! `rusttype`, sized so that one em spans the requested pixel size.

use anyhow::{anyhow, bail, Context, Result};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// Draws a string onto a card canvas.
pub trait TextRasterizer {
    /// Draw `text` with its baseline starting at `origin`, one em being
    /// `size_px` pixels tall.
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        origin: (i64, i64),
        colour: Rgba<u8>,
    ) -> Result<()>;
}

pub struct FontRasterizer {
    font: Font<'static>,
}

impl FontRasterizer {
    pub fn new(font: Font<'static>) -> FontRasterizer {
        FontRasterizer { font }
    }

    /// Load a font from disk.
    ///
    /// Supports:
    /// - "./fonts/impact.ttf" - the file itself
    /// - "./fonts/Impact" - loads Impact.ttf or Impact-Regular.ttf
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FontRasterizer> {
        let path = find_font_file(path.as_ref(), &["", "Regular", "regular"])?;
        let data = std::fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| anyhow!("Failed to parse font file: {}", path.display()))?;
        Ok(FontRasterizer::new(font))
    }

    /// Scale at which one em of the font is `size_px` pixels.
    fn em_scale(&self, size_px: f32) -> Scale {
        let metrics = self.font.v_metrics_unscaled();
        let units_per_em = self.font.units_per_em() as f32;
        Scale::uniform(size_px * (metrics.ascent - metrics.descent) / units_per_em)
    }
}

impl TextRasterizer for FontRasterizer {
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size_px: f32,
        origin: (i64, i64),
        colour: Rgba<u8>,
    ) -> Result<()> {
        if let Some(missing) = text
            .chars()
            .find(|c| !c.is_whitespace() && self.font.glyph(*c).id().0 == 0)
        {
            bail!("Font has no glyph for {missing:?} in `{text}`");
        }

        let scale = self.em_scale(size_px);
        let start = point(origin.0 as f32, origin.1 as f32);
        let (width, height) = canvas.dimensions();
        for glyph in self.font.layout(text, scale, start) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                blend_over(canvas.get_pixel_mut(px as u32, py as u32), colour, coverage);
            });
        }
        Ok(())
    }
}

/// Blend `colour` over `dst` with the given coverage in `0.0..=1.0`.
fn blend_over(dst: &mut Rgba<u8>, colour: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * colour.0[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for c in 0..3 {
        dst.0[c] = (colour.0[c] as f32 * alpha + dst.0[c] as f32 * inv).round() as u8;
    }
    dst.0[3] = (255.0 * alpha + dst.0[3] as f32 * inv).round() as u8;
}

fn find_font_file(base: &Path, suffixes: &[&str]) -> Result<PathBuf> {
    // if base path already has a font extension, use it directly
    if base
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
    {
        if base.exists() {
            return Ok(base.to_path_buf());
        }
        return Err(anyhow!("Font file not found: {}", base.display()));
    }

    let candidates: Vec<PathBuf> = suffixes
        .iter()
        .map(|suffix| {
            if suffix.is_empty() {
                base.with_extension("ttf")
            } else {
                PathBuf::from(format!("{}-{}.ttf", base.display(), suffix))
            }
        })
        .collect();

    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    Err(anyhow!(
        "Could not find font file. Tried: {}. \
        \nHint: point `font` in deck.toml at a .ttf file",
        tried.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_full_coverage_replaces_colour() {
        let mut dst = Rgba([255, 255, 255, 255]);
        blend_over(&mut dst, Rgba([0, 68, 102, 255]), 1.0);
        assert_eq!(dst, Rgba([0, 68, 102, 255]));
    }

    #[test]
    fn blend_zero_coverage_is_noop() {
        let mut dst = Rgba([10, 20, 30, 40]);
        blend_over(&mut dst, Rgba([0, 68, 102, 255]), 0.0);
        assert_eq!(dst, Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn blend_half_coverage_mixes() {
        let mut dst = Rgba([200, 200, 200, 255]);
        blend_over(&mut dst, Rgba([0, 100, 200, 255]), 0.5);
        assert_eq!(dst, Rgba([100, 150, 200, 255]));
    }

    #[test]
    fn missing_font_lists_candidates() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let err = find_font_file(&dir.path().join("Impact"), &["", "Regular"])
            .expect_err("font doesn't exist");
        let msg = err.to_string();
        assert!(msg.contains("Impact.ttf"));
        assert!(msg.contains("Impact-Regular.ttf"));
    }

    #[test]
    fn finds_suffixed_font() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let regular = dir.path().join("Impact-Regular.ttf");
        std::fs::write(&regular, b"not really a font").expect("can write file");
        let found = find_font_file(&dir.path().join("Impact"), &["", "Regular"])
            .expect("can find font");
        assert_eq!(found, regular);
    }

    #[test]
    fn unparseable_font_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not really a font").expect("can write file");
        assert!(FontRasterizer::load(&path).is_err());
    }
}
