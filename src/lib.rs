// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # single_line_text
//!
//! Replace the text of an SVG document with single-stroke glyph paths drawn
//! from an SVG font, for pen plotters and other single-line output devices.
//!
//! ## Pipeline
//!
//! 1. **Extract**: walk every `<text>`/`<tspan>` of the source document and
//!    resolve its absolute position, font size and anchor
//!    ([`document::DocumentTextExtractor`]).
//! 2. **Rasterize**: lay the run's characters out with a single-line
//!    [`fonts::GlyphFont`] at a neutral origin ([`text::TextRasterizer`]).
//! 3. **Align**: estimate the footprint of the original text, measure the
//!    generated strokes and solve the scale + translation between them
//!    ([`layout::bbox`], [`layout::alignment`]).
//! 4. **Compose**: add the user's font scale, offsets and line spacing on top
//!    of the alignment ([`layout::compose`]).
//! 5. **Serialize**: write the converted document ([`writer::SvgWriter`]).
//!
//! Non-fatal problems (rotation, clamped scales, missing glyphs) are collected
//! as [`diagnostics::Diagnostic`]s; a render pass always completes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use single_line_text::{Converter, GlyphFont, RenderConfig};
//!
//! let font = GlyphFont::parse("EMS Readability", &std::fs::read_to_string("EMSReadability.svg")?)?;
//! let source = std::fs::read_to_string("labels.svg")?;
//! let output = Converter::new(&font).convert(&source, &RenderConfig::default())?;
//! std::fs::write("labels_converted.svg", output.svg)?;
//! for diagnostic in output.diagnostics.entries() {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Non-fatal notifications
pub mod diagnostics;

// Configuration
pub mod config;

// Geometry
pub mod geometry;

// Glyph outlines and single-line fonts
pub mod fonts;
pub mod path;

// Text layout and alignment
pub mod layout;
pub mod text;

// Source documents
pub mod document;

// Output documents
pub mod writer;

// Render pass orchestration
pub mod pipeline;

// Caller-side font selection and readiness polling
pub mod session;

// Re-exports
pub use config::RenderConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use fonts::{FontCache, Glyph, GlyphFont};
pub use geometry::{Matrix, Point, Rect};
pub use pipeline::{ConversionOutput, Converter, RenderPass, RenderStage};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        /// Leading CSS/SVG number, optionally followed by a unit
        static ref RE_LEADING_NUMBER: Regex =
            Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)").unwrap();
    }

    /// Parse the numeric prefix of an attribute or CSS value (`"12px"` -> 12).
    ///
    /// Returns `None` when the value does not start with a number or the
    /// number is not finite.
    pub fn parse_leading_number(value: &str) -> Option<f64> {
        let caps = RE_LEADING_NUMBER.captures(value)?;
        let number: f64 = caps.get(1)?.as_str().parse().ok()?;
        number.is_finite().then_some(number)
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "single_line_text");
    }
}
