use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard paper sizes, measured in points.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    /// Width and height in points, using the sizes ImageMagick uses for the
    /// same page names.
    pub fn points(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageSize::A3 => "a3",
            PageSize::A4 => "a4",
            PageSize::A5 => "a5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How sheets are turned and placed onto print pages.
///
/// The rotation and offset are print registration values for a particular
/// printer and cutter; they are carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpec {
    pub size: PageSize,
    /// Distance of a sheet's left edge from the page's left edge, in points
    pub offset_x: i32,
    /// Distance of a sheet's top edge from the page's top edge, in points
    pub offset_y: i32,
    /// Clockwise rotation applied to every sheet before placing it
    pub rotation: u32,
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec {
            size: PageSize::A4,
            offset_x: 100,
            offset_y: 0,
            rotation: 270,
        }
    }
}

impl PageSpec {
    /// ImageMagick page geometry, e.g. `a4+100+0`.
    pub fn geometry(&self) -> String {
        format!("{}{:+}{:+}", self.size, self.offset_x, self.offset_y)
    }
}
