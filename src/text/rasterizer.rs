//! Lay a string out glyph by glyph.
//!
//! The cursor starts at the origin and advances by
//! `advance_width * (font_size / units_per_em) * letter_spacing` per
//! character. Unmapped characters draw nothing and advance by the fallback
//! width. Iteration is by Unicode scalar value.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::fonts::GlyphFont;
use crate::geometry::Point;
use crate::path::{to_path_data, transform_outline, PathOperation, SkippedCommand};

/// Strokes of one drawn character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphFragment {
    /// Character the strokes belong to
    pub character: char,
    /// Absolute operations in document space
    pub operations: Vec<PathOperation>,
}

/// Result of rasterizing one string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterizedText {
    /// One fragment per character with a non-empty outline
    pub fragments: Vec<GlyphFragment>,
    /// Total cursor advance in document units
    pub advance: f64,
    /// Characters without a glyph, in order of appearance
    pub missing: Vec<char>,
    /// Outline commands skipped while transforming
    pub skipped: Vec<SkippedCommand>,
}

impl RasterizedText {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.operations.is_empty())
    }

    /// All operations of all fragments, in drawing order.
    pub fn operations(&self) -> Vec<PathOperation> {
        self.fragments
            .iter()
            .flat_map(|f| f.operations.iter().copied())
            .collect()
    }

    /// Combined path data of the whole string.
    pub fn to_path_data(&self) -> String {
        to_path_data(&self.operations())
    }

    /// Report missing glyphs and skipped commands.
    pub fn report(&self, diagnostics: &mut Diagnostics) {
        for &character in &self.missing {
            diagnostics.push(Diagnostic::MissingGlyph { character });
        }
        for skipped in &self.skipped {
            diagnostics.push(Diagnostic::SkippedCommand {
                command: skipped.letter,
                reason: skipped.reason.clone(),
            });
        }
    }
}

/// Lays strings out with one font.
#[derive(Debug, Clone, Copy)]
pub struct TextRasterizer<'a> {
    font: &'a GlyphFont,
}

impl<'a> TextRasterizer<'a> {
    /// Create a rasterizer over `font`.
    pub fn new(font: &'a GlyphFont) -> Self {
        Self { font }
    }

    /// Rasterize `text` with its baseline origin at `origin`.
    ///
    /// Returns an empty result when the font is not ready or the text is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Point;
    /// use single_line_text::text::TextRasterizer;
    /// use single_line_text::GlyphFont;
    ///
    /// let font = GlyphFont::parse(
    ///     "demo",
    ///     r#"<font><glyph unicode="I" horiz-adv-x="200" d="M 100 0 L 100 700"/></font>"#,
    /// )
    /// .unwrap();
    /// let text = TextRasterizer::new(&font).rasterize("II", Point::origin(), 10.0, 1.0);
    /// assert_eq!(text.fragments.len(), 2);
    /// assert_eq!(text.advance, 4.0);
    /// ```
    pub fn rasterize(
        &self,
        text: &str,
        origin: Point,
        font_size: f64,
        letter_spacing: f64,
    ) -> RasterizedText {
        let mut result = RasterizedText::default();
        if text.is_empty() {
            return result;
        }
        if !self.font.is_ready() {
            log::debug!("Font {} not ready; nothing rasterized", self.font.name());
            return result;
        }

        let units_per_em = self.font.units_per_em();
        let step = font_size / units_per_em * letter_spacing;
        let mut cursor_x = origin.x;

        for ch in text.chars() {
            match self.font.glyph(ch) {
                Some(glyph) => {
                    if glyph.has_outline() {
                        let transformed = transform_outline(
                            &glyph.commands,
                            Point::new(cursor_x, origin.y),
                            font_size,
                            units_per_em,
                        );
                        result.fragments.push(GlyphFragment {
                            character: ch,
                            operations: transformed.operations,
                        });
                        result.skipped.extend(transformed.skipped);
                    }
                },
                None => result.missing.push(ch),
            }
            cursor_x += self.font.advance_for(ch) * step;
        }

        result.advance = cursor_x - origin.x;
        result
    }
}
