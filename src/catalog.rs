//! The items a deck is built from.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One catalog entry, and therefore one card per destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier; also the payload of the card's code symbol
    pub id: String,
    /// Icon filename, relative to the icons directory
    pub image: PathBuf,
    /// Localized label. When missing, a label is derived from the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Item {
    pub fn new<S: ToString, P: Into<PathBuf>>(id: S, image: P) -> Item {
        Item {
            id: id.to_string(),
            image: image.into(),
            text: None,
        }
    }

    pub fn with_text<S: ToString>(mut self, text: S) -> Item {
        self.text = Some(text.to_string());
        self
    }

    pub fn label(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => title_from_tag(&self.id),
        }
    }

    /// The icon's bare filename, which every generated file is named after.
    pub fn file_name(&self) -> Result<&Path> {
        self.image
            .file_name()
            .map(Path::new)
            .ok_or_else(|| anyhow!("Item `{}` has no image filename", self.id))
    }
}

/// Turn a tag such as `MAGIC_BALL` into a label such as `Magic Ball`.
pub fn title_from_tag(tag: &str) -> String {
    let mut title = String::with_capacity(tag.len());
    let mut at_word_start = true;
    for c in tag.chars() {
        let c = if c == '_' { ' ' } else { c };
        if at_word_start {
            title.extend(c.to_uppercase());
        } else {
            title.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphanumeric();
    }
    title
}

/// Reject catalogs that would produce ambiguous codes or colliding files.
pub fn validate(items: &[Item]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut files = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            bail!("Item #{} has an empty id", i + 1);
        }
        if !ids.insert(item.id.as_str()) {
            bail!("Item id `{}` appears more than once", item.id);
        }
        let file = item.file_name()?;
        if !files.insert(file) {
            bail!(
                "Items share the image filename `{}`; their cards would overwrite each other",
                file.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_from_tags() {
        assert_eq!(title_from_tag("MAGIC_BALL"), "Magic Ball");
        assert_eq!(title_from_tag("NUM_1"), "Num 1");
        assert_eq!(title_from_tag("X-RAY_SPECS"), "X-Ray Specs");
        assert_eq!(title_from_tag(""), "");
    }

    #[test]
    fn explicit_text_wins() {
        let item = Item::new("MAGIC_BALL", "magic_ball.png").with_text("Zauberkugel");
        assert_eq!(item.label(), "Zauberkugel");
        assert_eq!(Item::new("MAGIC_BALL", "magic_ball.png").label(), "Magic Ball");
    }

    #[test]
    fn empty_text_is_kept() {
        let item = Item::new("MAGIC_BALL", "magic_ball.png").with_text("");
        assert_eq!(item.label(), "");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let items = vec![
            Item::new("MAGIC_BALL", "a.png"),
            Item::new("MAGIC_BALL", "b.png"),
        ];
        let err = validate(&items).expect_err("duplicate ids");
        assert!(err.to_string().contains("MAGIC_BALL"));
    }

    #[test]
    fn colliding_files_are_rejected() {
        let items = vec![
            Item::new("A", "icons/same.png"),
            Item::new("B", "other/same.png"),
        ];
        assert!(validate(&items).is_err());
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(validate(&[Item::new(" ", "a.png")]).is_err());
    }

    #[test]
    fn valid_catalog_passes() {
        let items = vec![Item::new("A", "a.png"), Item::new("B", "b.png")];
        validate(&items).expect("catalog is valid");
        validate(&[]).expect("empty catalog is valid");
    }
}
