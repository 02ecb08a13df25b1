//! Deck build orchestration.
//!
//! Runs strictly in sequence: every card for every destination is composed
//! and written first, then each destination's cards are packed into sheets, and
//! finally each destination's sheets are paginated. Any failure stops the build;
//! files written up to that point are left on disk.

use crate::card::{CardComposer, TextRasterizer};
use crate::config::{Configuration, Destination};
use crate::sheets::{self, SheetNames};
use crate::tools::{SheetTool, SymbolEncoder};
use anyhow::{Context, Result};
use image::RgbaImage;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// What was written for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationReport {
    pub name: String,
    pub sheet_name: String,
    pub cards: Vec<PathBuf>,
    pub partials: Vec<PathBuf>,
    pub full: Option<PathBuf>,
    pub document: Option<PathBuf>,
}

pub struct Pipeline<'a> {
    config: &'a Configuration,
    composer: CardComposer<'a>,
    encoder: &'a dyn SymbolEncoder,
    sheets: &'a dyn SheetTool,
}

fn load_image(path: &Path, what: &str) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load {what} {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Configuration,
        rasterizer: &'a dyn TextRasterizer,
        encoder: &'a dyn SymbolEncoder,
        sheets: &'a dyn SheetTool,
    ) -> Pipeline<'a> {
        Pipeline {
            config,
            composer: CardComposer::new(config.card.clone(), rasterizer),
            encoder,
            sheets,
        }
    }

    /// How many cards a full run composes.
    pub fn card_count(&self) -> usize {
        self.config.items.len() * self.config.destinations.len()
    }

    pub fn run(&self, progress: &ProgressBar) -> Result<Vec<DestinationReport>> {
        let cards = self
            .compose_cards(progress)
            .with_context(|| "Failed to compose cards")?;

        let mut reports = Vec::with_capacity(self.config.destinations.len());
        for (destination, cards) in self.config.destinations.iter().zip(cards) {
            let names = SheetNames::new(&self.config.sprites_dir, &destination.sheet_name);
            let packed = sheets::pack(
                self.sheets,
                &cards,
                &self.config.filler,
                self.config.chunk_size,
                &names,
            )
            .with_context(|| format!("Failed to build sprite sheets for {}", destination.name))?;
            reports.push(DestinationReport {
                name: destination.name.clone(),
                sheet_name: destination.sheet_name.clone(),
                cards,
                partials: packed.partials,
                full: packed.full,
                document: None,
            });
        }

        for report in reports.iter_mut() {
            let names = SheetNames::new(&self.config.sprites_dir, &report.sheet_name);
            report.document =
                sheets::paginate(self.sheets, &report.partials, &self.config.page, &names)
                    .with_context(|| format!("Failed to build page document for {}", report.name))?;
        }

        Ok(reports)
    }

    /// Compose and write every card, returning each destination's card paths
    /// in catalog order.
    fn compose_cards(&self, progress: &ProgressBar) -> Result<Vec<Vec<PathBuf>>> {
        let destinations = &self.config.destinations;

        create_dir(&self.config.scratch_dir)?;
        create_dir(&self.config.sprites_dir)?;
        let mut templates = Vec::with_capacity(destinations.len());
        for destination in destinations.iter() {
            create_dir(&destination.cards_dir)?;
            templates.push(load_image(&destination.template, "card template")?);
        }

        let mut cards: Vec<Vec<PathBuf>> = vec![Vec::new(); destinations.len()];
        for item in self.config.items.iter() {
            let file = item.file_name()?;
            let icon = load_image(&self.config.icon_path(item), "icon")?;
            let code_path = self.config.code_path(file);
            let text = item.label();
            log::debug!("{} {} {:?}", item.id, item.image.display(), text);

            for ((destination, template), written) in
                destinations.iter().zip(templates.iter()).zip(cards.iter_mut())
            {
                progress.set_message(format!("{} ({})", item.id, destination.name));
                let path = self
                    .write_card(destination, file, &code_path, &item.id, &icon, template, &text)
                    .with_context(|| {
                        format!("Failed to create {} card for `{}`", destination.name, item.id)
                    })?;
                written.push(path);
                progress.inc(1);
            }
        }
        Ok(cards)
    }

    #[allow(clippy::too_many_arguments)]
    fn write_card(
        &self,
        destination: &Destination,
        file: &Path,
        code_path: &Path,
        tag: &str,
        icon: &RgbaImage,
        template: &RgbaImage,
        text: &str,
    ) -> Result<PathBuf> {
        let card = self
            .composer
            .compose(self.encoder, tag, code_path, icon, template, text)?;
        let out = destination.card_path(file);
        card.save(&out)
            .with_context(|| format!("Failed to write card {}", out.display()))?;
        Ok(out)
    }
}
