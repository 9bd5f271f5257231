//! One-call conversion over a [`RenderPass`].

use super::render_pass::{RenderPass, RenderedRun};
use crate::config::RenderConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fonts::GlyphFont;

/// Everything a conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Converted document
    pub svg: String,
    /// Runs that produced strokes
    pub runs: Vec<RenderedRun>,
    /// Warnings raised along the way
    pub diagnostics: Diagnostics,
}

/// Converts whole documents with one font.
///
/// # Examples
///
/// ```
/// use single_line_text::{Converter, GlyphFont, RenderConfig};
///
/// let font = GlyphFont::parse(
///     "demo",
///     r#"<font><glyph unicode="I" horiz-adv-x="200" d="M 100 0 L 100 700"/></font>"#,
/// )
/// .unwrap();
/// let output = Converter::new(&font)
///     .convert(r#"<svg><text x="5" y="20">II</text></svg>"#, &RenderConfig::default())
///     .unwrap();
/// assert_eq!(output.runs.len(), 1);
/// assert!(output.svg.contains("single-line-text-converted"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    font: &'a GlyphFont,
}

impl<'a> Converter<'a> {
    /// Create a converter over `font`.
    pub fn new(font: &'a GlyphFont) -> Self {
        Self { font }
    }

    /// Run a full pass over `source`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or malformed XML. Per-run problems
    /// are reported through [`ConversionOutput::diagnostics`] instead.
    pub fn convert(&self, source: &str, config: &RenderConfig) -> Result<ConversionOutput> {
        let mut pass = RenderPass::new(self.font, config)?;
        let run_count = pass.extract(source)?.len();
        log::info!("Converting {} text runs with {}", run_count, self.font.name());

        pass.align_all()?;
        let svg = pass.serialize()?;
        let (runs, diagnostics) = pass.finish();

        if runs.len() < run_count {
            log::warn!("{} of {} runs produced no strokes", run_count - runs.len(), run_count);
        }
        Ok(ConversionOutput {
            svg,
            runs,
            diagnostics,
        })
    }
}
