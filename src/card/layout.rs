use super::label::LabelRules;
use serde::{Deserialize, Serialize};

/// A position on the card canvas, in pixels from the top-left corner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

/// Card geometry.
///
/// Every card shares one canvas size, so all positions are constants of the
/// layout rather than being computed per image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardLayout {
    /// Canvas width in pixels; templates must match
    pub width: u32,
    /// Canvas height in pixels; templates must match
    pub height: u32,
    /// Where the top-left corner of the code symbol goes
    pub code_offset: Offset,
    /// Where the top-left corner of the icon goes. Icons are not scaled.
    pub icon_offset: Offset,
    /// RGBA colour of the label text
    pub text_colour: [u8; 4],
    /// Resolution used to convert label point sizes to pixels
    pub text_dpi: f32,
    /// Left edge used for labels too long to centre
    pub min_text_x: i64,
    /// Quiet zone around the code symbol, in modules
    pub code_margin: u32,
    /// Size of one code module, in pixels
    pub code_scale: u32,
    pub labels: LabelRules,
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout {
            width: 750,
            height: 1050,
            code_offset: Offset { x: 220, y: 730 },
            icon_offset: Offset { x: 100, y: 180 },
            text_colour: [0, 68, 102, 255],
            text_dpi: 300.0,
            min_text_x: 5,
            code_margin: 2,
            code_scale: 12,
            labels: LabelRules::default(),
        }
    }
}

impl CardLayout {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_layout_keeps_defaults() {
        let layout: CardLayout = toml::from_str("width = 500\n[icon_offset]\nx = 10\ny = 20\n")
            .expect("can parse partial layout");
        assert_eq!(layout.width, 500);
        assert_eq!(layout.height, 1050);
        assert_eq!(layout.icon_offset, Offset { x: 10, y: 20 });
        assert_eq!(layout.code_offset, Offset { x: 220, y: 730 });
        assert_eq!(layout.labels, LabelRules::default());
    }
}
