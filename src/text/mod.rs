//! Text layout with single-line fonts.
//!
//! [`TextRasterizer`] turns a string into positioned single-stroke glyph
//! fragments.

pub mod rasterizer;

pub use rasterizer::{GlyphFragment, RasterizedText, TextRasterizer};
