//! `deck.toml` configuration.
//!
//! Everything has a default that reproduces the standard deck layout, so a
//! minimal file only needs to list its items. Relative paths are resolved
//! against the working directory.

use crate::card::CardLayout;
use crate::catalog::{self, Item};
use crate::sheets::PageSpec;
use crate::tools::magick::{Convert, QrEncode};
use crate::tools::native::{ImageSheets, QrEncoder};
use crate::tools::{SheetTool, SymbolEncoder};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which implementation generates codes and assembles sheets.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process image, QR, and PDF generation
    #[default]
    Native,
    /// `qrencode` and ImageMagick's `convert`
    Magick,
}

/// One output pipeline: a card template and where its cards and sheets go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    /// Used for the sprite sheet and page document filenames
    pub sheet_name: String,
    /// Card template image; must match the card layout's size
    pub template: PathBuf,
    /// Directory single cards are written to
    pub cards_dir: PathBuf,
    /// Prepended to the icon filename to name each card
    #[serde(default = "default_card_prefix")]
    pub card_prefix: String,
}

fn default_card_prefix() -> String {
    "card-".to_string()
}

impl Destination {
    pub fn card_path(&self, item_file: &Path) -> PathBuf {
        self.cards_dir
            .join(format!("{}{}", self.card_prefix, item_file.display()))
    }
}

/// Complete configuration for a card deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// TrueType font for labels
    #[serde(default = "default_font")]
    pub font: PathBuf,
    /// Directory holding item icons
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
    /// Blank card used to pad out the last strip of a sheet
    #[serde(default = "default_filler")]
    pub filler: PathBuf,
    /// Where code symbols are written while cards are composed
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Where sprite sheets and page documents are written
    #[serde(default = "default_sprites_dir")]
    pub sprites_dir: PathBuf,
    /// Cards per sheet strip
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub backend: Backend,
    /// `qrencode` executable, for the magick backend
    #[serde(default = "default_qrencode")]
    pub qrencode: String,
    /// ImageMagick `convert` executable, for the magick backend
    #[serde(default = "default_convert")]
    pub convert: String,
    /// Pixel density sheets are printed at, for the native backend
    #[serde(default = "default_print_dpi")]
    pub print_dpi: f32,
    #[serde(default)]
    pub card: CardLayout,
    #[serde(default)]
    pub page: PageSpec,
    #[serde(default = "default_destinations")]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_font() -> PathBuf {
    PathBuf::from("impact.ttf")
}
fn default_icons_dir() -> PathBuf {
    PathBuf::from("../assets/images")
}
fn default_filler() -> PathBuf {
    PathBuf::from("card-tpl-blank.png")
}
fn default_scratch_dir() -> PathBuf {
    PathBuf::from("qr_out")
}
fn default_sprites_dir() -> PathBuf {
    PathBuf::from("sprites")
}
fn default_chunk_size() -> usize {
    5
}
fn default_qrencode() -> String {
    "qrencode".to_string()
}
fn default_convert() -> String {
    "convert".to_string()
}
fn default_print_dpi() -> f32 {
    300.0
}
fn default_destinations() -> Vec<Destination> {
    vec![
        Destination {
            name: "plain".to_string(),
            sheet_name: "sprite_nobg".to_string(),
            template: PathBuf::from("card-tpl.png"),
            cards_dir: PathBuf::from("cards"),
            card_prefix: default_card_prefix(),
        },
        Destination {
            name: "backed".to_string(),
            sheet_name: "sprite_bg".to_string(),
            template: PathBuf::from("card-tpl-bg.png"),
            cards_dir: PathBuf::from("cards-bg"),
            card_prefix: default_card_prefix(),
        },
    ]
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            font: default_font(),
            icons_dir: default_icons_dir(),
            filler: default_filler(),
            scratch_dir: default_scratch_dir(),
            sprites_dir: default_sprites_dir(),
            chunk_size: default_chunk_size(),
            backend: Backend::default(),
            qrencode: default_qrencode(),
            convert: default_convert(),
            print_dpi: default_print_dpi(),
            card: CardLayout::default(),
            page: PageSpec::default(),
            destinations: default_destinations(),
            items: Vec::new(),
        }
    }
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk_size must be at least 1");
        }
        if self.print_dpi <= 0.0 {
            bail!("print_dpi must be positive");
        }
        if self.page.rotation % 90 != 0 {
            bail!("page rotation must be a multiple of 90 degrees");
        }
        let mut names: Vec<&str> = self.destinations.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            bail!("destination names must be unique");
        }
        let mut sheets: Vec<&str> = self
            .destinations
            .iter()
            .map(|d| d.sheet_name.as_str())
            .collect();
        sheets.sort_unstable();
        if sheets.windows(2).any(|w| w[0] == w[1]) {
            bail!("destinations must use different sheet names");
        }
        let mut dirs: Vec<&Path> = self.destinations.iter().map(|d| d.cards_dir.as_path()).collect();
        dirs.sort_unstable();
        if dirs.windows(2).any(|w| w[0] == w[1]) {
            bail!("destinations must write cards to different directories");
        }
        catalog::validate(&self.items)
    }

    pub fn icon_path(&self, item: &Item) -> PathBuf {
        self.icons_dir.join(&item.image)
    }

    pub fn code_path(&self, item_file: &Path) -> PathBuf {
        self.scratch_dir
            .join(format!("qr-{}", item_file.display()))
    }

    pub fn symbol_encoder(&self) -> Box<dyn SymbolEncoder> {
        match self.backend {
            Backend::Native => Box::new(QrEncoder {
                margin: self.card.code_margin,
                scale: self.card.code_scale,
            }),
            Backend::Magick => Box::new(QrEncode {
                program: self.qrencode.clone(),
                margin: self.card.code_margin,
                scale: self.card.code_scale,
            }),
        }
    }

    pub fn sheet_tool(&self) -> Box<dyn SheetTool> {
        match self.backend {
            Backend::Native => Box::new(ImageSheets {
                print_dpi: self.print_dpi,
            }),
            Backend::Magick => Box::new(Convert {
                program: self.convert.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_configuration() {
        let mut config = Configuration::default();
        config
            .items
            .push(Item::new("MAGIC_BALL", "magic_ball.png").with_text("Zauberkugel"));
        let text = toml::to_string(&config).expect("can serialize configuration to TOML");
        let back: Configuration = toml::from_str(&text).expect("can parse serialized TOML");
        assert_eq!(back.items, config.items);
        assert_eq!(back.card, config.card);
        assert_eq!(back.page, config.page);
        assert_eq!(back.destinations, config.destinations);
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let config: Configuration = toml::from_str(
            r#"
            [[items]]
            id = "MAGIC_BALL"
            image = "magic_ball.png"
            "#,
        )
        .expect("can parse minimal config");
        config.validate().expect("minimal config is valid");
        assert_eq!(config.chunk_size, 5);
        assert_eq!(config.backend, Backend::Native);
        assert_eq!(config.destinations.len(), 2);
        assert_eq!(config.page.geometry(), "a4+100+0");
        assert_eq!(config.card.width, 750);
        assert_eq!(config.items[0].label(), "Magic Ball");
    }

    #[test]
    fn derived_paths() {
        let config = Configuration::default();
        let item = Item::new("MAGIC_BALL", "magic_ball.png");
        let file = item.file_name().expect("has a filename");
        assert_eq!(
            config.icon_path(&item),
            PathBuf::from("../assets/images/magic_ball.png")
        );
        assert_eq!(config.code_path(file), PathBuf::from("qr_out/qr-magic_ball.png"));
        assert_eq!(
            config.destinations[1].card_path(file),
            PathBuf::from("cards-bg/card-magic_ball.png")
        );
    }

    #[test]
    fn destinations_name_their_own_files() {
        let config: Configuration = toml::from_str(
            r#"
            [[destinations]]
            name = "plain"
            sheet_name = "sprite_nobg"
            template = "card-tpl.png"
            cards_dir = "cards"

            [[destinations]]
            name = "backed"
            sheet_name = "sprite_bg"
            template = "card-tpl-bg.png"
            cards_dir = "cards-bg"
            card_prefix = "bg-"
            "#,
        )
        .expect("can parse destinations");
        config.validate().expect("destinations are valid");

        let file = Path::new("magic_ball.png");
        assert_eq!(config.destinations[0].card_prefix, "card-");
        assert_eq!(
            config.destinations[0].card_path(file),
            PathBuf::from("cards/card-magic_ball.png")
        );
        assert_eq!(
            config.destinations[1].card_path(file),
            PathBuf::from("cards-bg/bg-magic_ball.png")
        );
        assert_eq!(config.destinations[1].sheet_name, "sprite_bg");
    }

    #[test]
    fn shared_sheet_names_are_invalid() {
        let mut config = Configuration::default();
        config.destinations[1].sheet_name = config.destinations[0].sheet_name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        let config = Configuration {
            chunk_size: 0,
            ..Configuration::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shared_card_dirs_are_invalid() {
        let mut config = Configuration::default();
        config.destinations[1].cards_dir = config.destinations[0].cards_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn backend_parses_lowercase() {
        let config: Configuration =
            toml::from_str("backend = \"magick\"").expect("can parse backend");
        assert_eq!(config.backend, Backend::Magick);
    }
}
