//! Map a generated box onto a target box.
//!
//! The scale comes from the width ratio alone so glyph strokes keep their
//! aspect ratio; the height ratio is only used to cross-check against the
//! ancestor scale. Horizontal placement follows the text anchor, vertical
//! placement always aligns centres.

use super::TextAnchor;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geometry::{Matrix, Rect};
use crate::path::format_number;

/// Smallest alignment scale ever applied.
pub const MIN_SCALE: f64 = 0.01;

/// Largest alignment scale ever applied.
pub const MAX_SCALE: f64 = 10.0;

/// Scales above this are reported as extreme.
const EXTREME_SCALE_HIGH: f64 = 5.0;

/// Scales below this are reported as extreme.
const EXTREME_SCALE_LOW: f64 = 0.05;

/// Allowed gap between the computed scale and the ancestor scale.
const MISMATCH_TOLERANCE: f64 = 0.1;

/// Scale + translation mapping generated geometry onto a target footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTransform {
    /// Horizontal translation
    pub translate_x: f64,
    /// Vertical translation
    pub translate_y: f64,
    /// Uniform scale actually applied
    pub scale: f64,
    /// Width ratio before clamping
    pub raw_scale: f64,
    /// Height ratio, for cross-checking only
    pub vertical_ratio: f64,
    /// Scale the caller expected (cumulative ancestor x scale)
    pub expected_scale: f64,
    /// True when `raw_scale` fell outside [`MIN_SCALE`, `MAX_SCALE`]
    pub clamped: bool,
    /// True when a box was unusable and identity was returned
    pub degenerate: bool,
}

impl AlignmentTransform {
    /// Identity alignment: scale 1, no translation.
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            raw_scale: 1.0,
            vertical_ratio: 1.0,
            expected_scale: 1.0,
            clamped: false,
            degenerate: false,
        }
    }

    /// Solve the alignment between `generated` and `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Rect;
    /// use single_line_text::layout::{AlignmentTransform, TextAnchor};
    ///
    /// let target = Rect::new(100.0, 50.0, 80.0, 20.0);
    /// let generated = Rect::new(0.0, 0.0, 40.0, 10.0);
    /// let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 2.0);
    /// assert_eq!(t.scale, 2.0);
    /// assert_eq!(t.translate_x, 100.0);
    /// assert_eq!(t.translate_y, 50.0);
    /// ```
    pub fn solve(target: &Rect, generated: &Rect, anchor: TextAnchor, expected_scale: f64) -> Self {
        if generated.is_degenerate() || target.is_degenerate() {
            log::debug!("Degenerate boxes (target {:?}, generated {:?})", target, generated);
            return Self {
                expected_scale,
                degenerate: true,
                ..Self::identity()
            };
        }

        let raw_scale = target.width / generated.width;
        let vertical_ratio = target.height / generated.height;
        let scale = raw_scale.clamp(MIN_SCALE, MAX_SCALE);

        let translate_x = match anchor {
            TextAnchor::Start => target.left() - generated.left() * scale,
            TextAnchor::Middle => target.center().x - generated.center().x * scale,
            TextAnchor::End => target.right() - generated.right() * scale,
        };
        let translate_y = target.center().y - generated.center().y * scale;

        Self {
            translate_x,
            translate_y,
            scale,
            raw_scale,
            vertical_ratio,
            expected_scale,
            clamped: scale != raw_scale,
            degenerate: false,
        }
    }

    /// True when the scale falls in the range reported as extreme.
    pub fn is_extreme(&self) -> bool {
        self.scale > EXTREME_SCALE_HIGH || self.scale < EXTREME_SCALE_LOW
    }

    /// True when the width ratio disagrees with the expected scale.
    pub fn is_mismatched(&self) -> bool {
        !self.degenerate && (self.raw_scale - self.expected_scale).abs() > MISMATCH_TOLERANCE
    }

    /// Push the diagnostics this alignment warrants for the run `content`.
    pub fn report(&self, content: &str, diagnostics: &mut Diagnostics) {
        if self.degenerate {
            diagnostics.push(Diagnostic::DegenerateBox {
                content: content.to_string(),
            });
            return;
        }
        if self.clamped {
            diagnostics.push(Diagnostic::ScaleClamped {
                content: content.to_string(),
                raw: self.raw_scale,
                clamped: self.scale,
            });
        }
        if self.is_extreme() {
            diagnostics.push(Diagnostic::ExtremeScale {
                content: content.to_string(),
                scale: self.scale,
            });
        }
        if self.is_mismatched() {
            diagnostics.push(Diagnostic::ScaleMismatch {
                content: content.to_string(),
                computed: self.raw_scale,
                expected: self.expected_scale,
            });
        }
    }

    /// Matrix form: scale first, then translate.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::scaling(self.scale, self.scale)
            .multiply(&Matrix::translation(self.translate_x, self.translate_y))
    }

    /// SVG transform list, `translate(tx, ty) scale(s)`.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({}, {}) scale({})",
            format_number(self.translate_x),
            format_number(self.translate_y),
            format_number(self.scale)
        )
    }
}

impl Default for AlignmentTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_anchor_example() {
        let target = Rect::new(100.0, 50.0, 80.0, 20.0);
        let generated = Rect::new(0.0, 0.0, 40.0, 10.0);
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 2.0);
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.translate_x, 100.0);
        assert_eq!(t.translate_y, 50.0);
        assert!(!t.clamped);
        assert!(!t.is_mismatched());
    }

    #[test]
    fn test_middle_and_end_anchors() {
        let target = Rect::new(100.0, 50.0, 80.0, 20.0);
        let generated = Rect::new(10.0, 0.0, 40.0, 10.0);
        let middle = AlignmentTransform::solve(&target, &generated, TextAnchor::Middle, 2.0);
        // centre 140 - 30 * 2
        assert_eq!(middle.translate_x, 80.0);
        let end = AlignmentTransform::solve(&target, &generated, TextAnchor::End, 2.0);
        // right 180 - 50 * 2
        assert_eq!(end.translate_x, 80.0);
        let start = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 2.0);
        assert_eq!(start.translate_x, 80.0);
    }

    #[test]
    fn test_self_alignment_is_identity() {
        let b = Rect::new(-3.0, 7.5, 12.0, 4.0);
        let t = AlignmentTransform::solve(&b, &b, TextAnchor::Start, 1.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 0.0);
    }

    #[test]
    fn test_clamp_is_observable() {
        let target = Rect::new(0.0, 0.0, 200.0, 10.0);
        let generated = Rect::new(0.0, 0.0, 10.0, 10.0);
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 1.0);
        assert_eq!(t.raw_scale, 20.0);
        assert_eq!(t.scale, MAX_SCALE);
        assert!(t.clamped);

        let tiny = AlignmentTransform::solve(
            &Rect::new(0.0, 0.0, 0.001, 1.0),
            &Rect::new(0.0, 0.0, 10.0, 1.0),
            TextAnchor::Start,
            1.0,
        );
        assert_eq!(tiny.scale, MIN_SCALE);
        assert!(tiny.clamped);
    }

    #[test]
    fn test_degenerate_boxes_yield_identity() {
        let target = Rect::new(10.0, 10.0, 50.0, 10.0);
        for generated in [
            Rect::zero(),
            Rect::new(0.0, 0.0, 40.0, 0.0),
            Rect::new(0.0, 0.0, f64::NAN, 5.0),
        ] {
            let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Middle, 1.0);
            assert!(t.degenerate);
            assert_eq!(t.scale, 1.0);
            assert_eq!((t.translate_x, t.translate_y), (0.0, 0.0));
        }
    }

    #[test]
    fn test_report_diagnostics() {
        let target = Rect::new(0.0, 0.0, 200.0, 10.0);
        let generated = Rect::new(0.0, 0.0, 10.0, 10.0);
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 1.0);
        let mut diagnostics = Diagnostics::new();
        t.report("Hi", &mut diagnostics);
        let entries = diagnostics.entries();
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], Diagnostic::ScaleClamped { clamped, .. } if clamped == 10.0));
        assert!(matches!(entries[1], Diagnostic::ExtremeScale { .. }));
        assert!(matches!(entries[2], Diagnostic::ScaleMismatch { expected, .. } if expected == 1.0));

        let mut diagnostics = Diagnostics::new();
        AlignmentTransform::solve(&target, &Rect::zero(), TextAnchor::Start, 1.0)
            .report("Hi", &mut diagnostics);
        assert!(matches!(diagnostics.entries(), [Diagnostic::DegenerateBox { .. }]));
    }

    #[test]
    fn test_matrix_maps_generated_onto_target() {
        let target = Rect::new(100.0, 50.0, 80.0, 20.0);
        let generated = Rect::new(0.0, 0.0, 40.0, 10.0);
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 2.0);
        assert!(generated.transformed(&t.to_matrix()).approx_eq(&target, 1e-9));
        assert_eq!(t.to_svg(), "translate(100, 50) scale(2)");
    }
}
