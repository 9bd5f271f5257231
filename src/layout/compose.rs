//! Layer user adjustments on top of an alignment transform.
//!
//! The final chain, written as an SVG transform list (leftmost applied last):
//!
//! ```text
//! translate(cx + dx, cy + dy + line) scale(font_scale) translate(-cx, -cy)   user adjustments
//! translate(tx, ty) scale(s)                                               alignment
//! ```
//!
//! `(cx, cy)` is the centre of the target box, so a font scale of 1 is a
//! no-op and scaling never moves the text. The order is fixed: alignment,
//! then user scale, then user offset, so offsets are document-space units.

use super::alignment::AlignmentTransform;
use crate::config::RenderConfig;
use crate::document::TextRun;
use crate::geometry::{Matrix, Rect};
use crate::path::format_number;
use std::fmt::Write as _;

/// One entry of a transform list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStep {
    /// `translate(x, y)`
    Translate(f64, f64),
    /// `scale(s)`
    Scale(f64),
}

impl TransformStep {
    /// Matrix of this single step.
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            TransformStep::Translate(x, y) => Matrix::translation(x, y),
            TransformStep::Scale(s) => Matrix::scaling(s, s),
        }
    }
}

/// Ordered transform list, outermost first (SVG order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformChain {
    /// Steps in SVG list order
    pub steps: Vec<TransformStep>,
}

impl TransformChain {
    /// Net matrix of the list.
    pub fn to_matrix(&self) -> Matrix {
        // The rightmost step is applied first.
        self.steps
            .iter()
            .rev()
            .fold(Matrix::identity(), |m, step| m.multiply(&step.to_matrix()))
    }

    /// Serialize as an SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = match *step {
                TransformStep::Translate(x, y) => {
                    write!(out, "translate({}, {})", format_number(x), format_number(y))
                },
                TransformStep::Scale(s) => write!(out, "scale({})", format_number(s)),
            };
        }
        out
    }
}

/// Everything the composer derives for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedTransform {
    /// Full transform list applied to the generated geometry
    pub chain: TransformChain,
    /// Vertical line-spacing correction included in the chain
    pub line_spacing_offset: f64,
    /// Target box after user scale and offsets
    pub final_box: Rect,
}

/// Extra vertical offset produced by the line-spacing multiplier.
///
/// `group_baseline_y` is the y of the first run in the same parent grouping;
/// standalone runs pass `None` and get no correction.
pub fn line_spacing_offset(run_y: f64, group_baseline_y: Option<f64>, multiplier: f64) -> f64 {
    match group_baseline_y {
        Some(base) => (run_y - base) * (multiplier - 1.0),
        None => 0.0,
    }
}

/// Target box scaled about its centre and shifted by the user offsets.
pub fn final_box(target: &Rect, config: &RenderConfig, line_offset: f64) -> Rect {
    target
        .scaled_about_center(config.font_scale)
        .translated(config.x_offset, config.y_offset + line_offset)
}

/// Build the final transform for `run`.
pub fn compose(
    run: &TextRun,
    alignment: &AlignmentTransform,
    target: &Rect,
    config: &RenderConfig,
    group_baseline_y: Option<f64>,
) -> ComposedTransform {
    let line_offset = line_spacing_offset(run.y, group_baseline_y, config.line_spacing);
    let center = target.center();

    let chain = TransformChain {
        steps: vec![
            TransformStep::Translate(
                center.x + config.x_offset,
                center.y + config.y_offset + line_offset,
            ),
            TransformStep::Scale(config.font_scale),
            TransformStep::Translate(-center.x, -center.y),
            TransformStep::Translate(alignment.translate_x, alignment.translate_y),
            TransformStep::Scale(alignment.scale),
        ],
    };

    ComposedTransform {
        chain,
        line_spacing_offset: line_offset,
        final_box: final_box(target, config, line_offset),
    }
}
