//! Caption sizing for the card label.
//!
//! Labels are sized with a two-tier rule rather than by measuring the rendered
//! text: anything longer than the threshold is drawn smaller, narrower, and a
//! little lower on the card. Length is the UTF-8 byte length of the text, so
//! the same catalog always produces the same cards.

use serde::{Deserialize, Serialize};

/// One of the fixed sizing regimes a label can be drawn with.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRegime {
    /// Font size in points
    pub font_size_pt: f32,
    /// Horizontal space reserved per byte of text when centring, in pixels
    pub letter_width: i64,
    /// Distance from the top of the card to the top of the em box, in pixels
    pub baseline_y: i64,
}

/// The rule used to pick a [`LabelRegime`] for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRules {
    /// Texts strictly longer than this use the `long` regime
    #[serde(default = "default_long_threshold")]
    pub long_threshold: usize,
    #[serde(default = "default_short_regime")]
    pub short: LabelRegime,
    #[serde(default = "default_long_regime")]
    pub long: LabelRegime,
}

fn default_long_threshold() -> usize {
    10
}
fn default_short_regime() -> LabelRegime {
    LabelRegime {
        font_size_pt: 20.0,
        letter_width: 40,
        baseline_y: 20,
    }
}
fn default_long_regime() -> LabelRegime {
    LabelRegime {
        font_size_pt: 15.0,
        letter_width: 30,
        baseline_y: 35,
    }
}

impl Default for LabelRules {
    fn default() -> Self {
        LabelRules {
            long_threshold: default_long_threshold(),
            short: default_short_regime(),
            long: default_long_regime(),
        }
    }
}

/// A label ready to be placed on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Label<'t> {
    pub text: &'t str,
    pub regime: LabelRegime,
}

impl LabelRules {
    pub fn format<'t>(&self, text: &'t str) -> Label<'t> {
        let regime = if text.len() > self.long_threshold {
            self.long
        } else {
            self.short
        };
        Label { text, regime }
    }
}

impl Label<'_> {
    /// Length used for layout, in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn font_size_pt(&self) -> f32 {
        self.regime.font_size_pt
    }

    /// The font size converted to whole pixels at `dpi`, truncated.
    pub fn font_size_px(&self, dpi: f32) -> i64 {
        (self.regime.font_size_pt * dpi / 72.0) as i64
    }

    /// Left edge of the text when centred on a canvas `canvas_width` wide.
    ///
    /// Text too long to centre starts at `min_x` instead of off the left edge.
    pub fn start_x(&self, canvas_width: u32, min_x: i64) -> i64 {
        let x = (canvas_width as i64 - self.len() as i64 * self.regime.letter_width) / 2;
        if x < 0 {
            min_x
        } else {
            x
        }
    }

    /// Baseline of the text, measured from the top of the canvas.
    pub fn baseline(&self, dpi: f32) -> i64 {
        self.regime.baseline_y + self.font_size_px(dpi)
    }
}
