//! Single card rendering.
//!
//! A card is a fixed-size template with three things drawn on it: the item's
//! code symbol, its icon at native resolution, and its localized label. All
//! positions come from [`CardLayout`], so changing the card design never means
//! touching the composition code.

mod compose;
mod font;
mod label;
mod layout;

pub use compose::CardComposer;
pub use font::{FontRasterizer, TextRasterizer};
pub use layout::CardLayout;
