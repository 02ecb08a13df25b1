use super::font::TextRasterizer;
use super::layout::CardLayout;
use crate::tools::SymbolEncoder;
use anyhow::{bail, Context, Result};
use image::{imageops, Rgba, RgbaImage};
use std::path::Path;

/// Lays a code symbol, an icon, and a label onto a card template.
pub struct CardComposer<'r> {
    layout: CardLayout,
    rasterizer: &'r dyn TextRasterizer,
}

impl<'r> CardComposer<'r> {
    pub fn new(layout: CardLayout, rasterizer: &'r dyn TextRasterizer) -> CardComposer<'r> {
        CardComposer { layout, rasterizer }
    }

    /// Render one card for `tag`.
    ///
    /// The code symbol is requested from `encoder`, which leaves a copy of it
    /// at `code_path`.
    pub fn compose(
        &self,
        encoder: &dyn SymbolEncoder,
        tag: &str,
        code_path: &Path,
        icon: &RgbaImage,
        template: &RgbaImage,
        text: &str,
    ) -> Result<RgbaImage> {
        let code = encoder
            .encode(tag, code_path)
            .with_context(|| format!("Failed to generate code symbol for `{tag}`"))?;
        self.compose_with_code(&code, icon, template, text)
    }

    /// Render one card from an already generated code symbol.
    pub fn compose_with_code(
        &self,
        code: &RgbaImage,
        icon: &RgbaImage,
        template: &RgbaImage,
        text: &str,
    ) -> Result<RgbaImage> {
        if template.dimensions() != self.layout.dimensions() {
            bail!(
                "Card template is {}x{} but cards are {}x{}",
                template.width(),
                template.height(),
                self.layout.width,
                self.layout.height
            );
        }

        let mut card = template.clone();
        imageops::overlay(
            &mut card,
            code,
            self.layout.code_offset.x,
            self.layout.code_offset.y,
        );
        imageops::overlay(
            &mut card,
            icon,
            self.layout.icon_offset.x,
            self.layout.icon_offset.y,
        );

        let label = self.layout.labels.format(text);
        let x = label.start_x(self.layout.width, self.layout.min_text_x);
        let baseline = label.baseline(self.layout.text_dpi);
        let size_px = label.font_size_pt() * self.layout.text_dpi / 72.0;
        self.rasterizer
            .draw_text(
                &mut card,
                label.text,
                size_px,
                (x, baseline),
                Rgba(self.layout.text_colour),
            )
            .with_context(|| format!("Failed to draw label `{text}`"))?;

        Ok(card)
    }
}
