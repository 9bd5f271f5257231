//! Single-line SVG fonts.
//!
//! This module provides SVG font parsing ([`glyph_font`]) and a by-name cache
//! of loaded fonts for a session ([`cache`]).

pub mod cache;
pub mod glyph_font;

pub use cache::FontCache;
pub use glyph_font::{FontData, Glyph, GlyphFont, DEFAULT_UNITS_PER_EM, FALLBACK_ADVANCE};
