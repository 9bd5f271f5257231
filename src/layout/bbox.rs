//! Bounding-box estimation for original and generated text.
//!
//! The *target* box approximates where the original text was drawn, from
//! font metrics alone. The *generated* box measures the vertices of freshly
//! rasterized strokes. Curve control points are deliberately ignored: the
//! measured extent is an approximation, not a true curve-inclusive bound.

use crate::document::TextRun;
use crate::fonts::GlyphFont;
use crate::geometry::{Point, Rect};
use crate::path::PathOperation;
use lazy_static::lazy_static;
use regex::Regex;

/// Average glyph width, in ems, assumed when no font metrics are available.
pub const FALLBACK_EM_WIDTH: f64 = 0.6;

/// Share of the font size between the baseline and the top of the target box.
pub const BASELINE_RATIO: f64 = 0.8;

lazy_static! {
    static ref RE_MOVE_LINE_PAIR: Regex = Regex::new(
        r"[MLml][\s,]*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)[\s,]*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)"
    )
    .unwrap();
    static ref RE_NUMBER: Regex =
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").unwrap();
}

/// Width of `text` at `font_size` before any ancestor scaling.
///
/// Sums per-character advances (with the missing-glyph fallback) when the
/// font is ready, otherwise assumes 0.6 em per character.
///
/// # Examples
///
/// ```
/// use single_line_text::layout::estimate_text_width;
/// use single_line_text::GlyphFont;
///
/// let pending = GlyphFont::pending("not yet");
/// assert!((estimate_text_width("abcd", &pending, 10.0, 1.0) - 24.0).abs() < 1e-9);
/// ```
pub fn estimate_text_width(text: &str, font: &GlyphFont, font_size: f64, letter_spacing: f64) -> f64 {
    if !font.is_ready() {
        log::debug!("Font {} not ready, using fallback width for {:?}", font.name(), text);
        return text.chars().count() as f64 * font_size * FALLBACK_EM_WIDTH;
    }
    let factor = font_size / font.units_per_em() * letter_spacing;
    text.chars().map(|ch| font.advance_for(ch) * factor).sum()
}

/// Estimated footprint of `run` as drawn in the source document.
///
/// Width comes from [`estimate_text_width`] at the run's own font size,
/// times the ancestor x scale; height is the font size times the ancestor
/// y scale. The box starts `0.8 * font_size * scale_y` above the baseline
/// and is shifted left by the anchor.
pub fn target_box(run: &TextRun, font: &GlyphFont, letter_spacing: f64) -> Rect {
    let width =
        estimate_text_width(&run.content, font, run.font_size, letter_spacing) * run.transform_scale_x;
    let height = run.font_size * run.transform_scale_y;
    let x = run.x + run.text_anchor.offset_for_width(width);
    let y = run.y - BASELINE_RATIO * run.font_size * run.transform_scale_y;
    let bbox = Rect::new(x, y, width, height);
    log::debug!(
        "Target box for {:?}: {},{} {}x{} (font size {}, scale {}x{})",
        run.content,
        bbox.x,
        bbox.y,
        bbox.width,
        bbox.height,
        run.font_size,
        run.transform_scale_x,
        run.transform_scale_y
    );
    bbox
}

/// Extent of the Move/Line vertices of `operations`; the zero box when there are none.
pub fn generated_box(operations: &[PathOperation]) -> Rect {
    Rect::enclosing(operations.iter().filter_map(PathOperation::vertex)).unwrap_or_else(Rect::zero)
}

/// Extent of serialized path data.
///
/// Takes the coordinate pair after every Move/Line letter; when there is
/// none, falls back to reading all numbers as consecutive x/y pairs.
pub fn generated_box_from_path_data(data: &str) -> Rect {
    let mut points: Vec<Point> = RE_MOVE_LINE_PAIR
        .captures_iter(data)
        .filter_map(|caps| {
            let x = caps.get(1)?.as_str().parse().ok()?;
            let y = caps.get(2)?.as_str().parse().ok()?;
            Some(Point::new(x, y))
        })
        .collect();

    if points.is_empty() {
        let numbers: Vec<f64> = RE_NUMBER
            .find_iter(data)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        points = numbers
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
    }

    Rect::enclosing(points).unwrap_or_else(Rect::zero)
}
