//! Packing cards into sprite sheets and sheets onto print pages.
//!
//! Every destination produces the same family of files under the sprites
//! directory, all named after the destination's sheet name:
//!
//! - `<name>_<index>.png`: one strip of cards per group ("partial sheets")
//! - `<name>.png`: all strips stacked top to bottom ("full sheet")
//! - `rotated_<name>_<index>.png`: each strip turned for printing
//! - `<name>.pdf`: the turned strips laid onto pages

mod chunking;
mod packer;
mod page;
mod paginator;

pub use packer::{pack, PackedSheets};
pub use page::PageSpec;
pub use paginator::paginate;

use std::path::{Path, PathBuf};

/// Output paths for one destination's sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    dir: PathBuf,
    name: String,
}

impl SheetNames {
    pub fn new<P: AsRef<Path>, S: ToString>(dir: P, name: S) -> SheetNames {
        SheetNames {
            dir: dir.as_ref().to_path_buf(),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partial(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.png", self.name, index))
    }

    pub fn full(&self) -> PathBuf {
        self.dir.join(format!("{}.png", self.name))
    }

    /// Rotated sheet paths, with `%d` standing in for the sheet index.
    pub fn rotated_pattern(&self) -> PathBuf {
        self.dir.join(format!("rotated_{}_%d.png", self.name))
    }

    pub fn document(&self) -> PathBuf {
        self.dir.join(format!("{}.pdf", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_paths() {
        let names = SheetNames::new("sprites", "sprite_bg");
        assert_eq!(names.partial(0), PathBuf::from("sprites/sprite_bg_0.png"));
        assert_eq!(names.partial(11), PathBuf::from("sprites/sprite_bg_11.png"));
        assert_eq!(names.full(), PathBuf::from("sprites/sprite_bg.png"));
        assert_eq!(
            names.rotated_pattern(),
            PathBuf::from("sprites/rotated_sprite_bg_%d.png")
        );
        assert_eq!(names.document(), PathBuf::from("sprites/sprite_bg.pdf"));
    }
}
