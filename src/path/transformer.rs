//! Map glyph outlines from font units to absolute document coordinates.
//!
//! Font outlines are authored with y pointing up; documents have y pointing
//! down. Every coordinate is scaled by `scale / units_per_em` and y values
//! are mirrored about the origin:
//!
//! ```text
//! x_doc = origin_x + x_font * scale / units_per_em
//! y_doc = origin_y - y_font * scale / units_per_em
//! ```
//!
//! Supported commands: `M m L l H h V v C c S s Z z`. Horizontal and vertical
//! lines come out as Line operations and smooth curves as full cubic curves.
//! Quadratic curves, arcs and unknown letters are skipped without moving the
//! current point; the rest of the outline is still processed.
//!
//! The smooth-curve reflection point is only remembered across consecutive
//! curve commands. Any Move, Line or Close in between resets it, and an
//! `S` without a remembered control point uses the current point.

use super::data::OutlineCommand;
use super::PathOperation;
use crate::geometry::Point;

/// Em size assumed when a caller passes a non-positive one.
const FALLBACK_UNITS_PER_EM: f64 = 1000.0;

/// A command (or part of one) the transformer did not emit.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCommand {
    /// Command letter as written
    pub letter: char,
    /// Why it was skipped
    pub reason: String,
}

/// Result of transforming one outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformedOutline {
    /// Absolute operations in document space
    pub operations: Vec<PathOperation>,
    /// Commands skipped along the way
    pub skipped: Vec<SkippedCommand>,
}

/// Cursor state while walking an outline.
struct Pen {
    origin: Point,
    factor: f64,
    current: Point,
    subpath_start: Point,
    last_control: Option<Point>,
}

impl Pen {
    /// Absolute font coordinate to document coordinate.
    fn absolute(&self, x: f64, y: f64) -> Point {
        Point::new(self.origin.x + x * self.factor, self.origin.y - y * self.factor)
    }

    /// Relative font offset applied to the current point.
    fn relative(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.current.x + dx * self.factor, self.current.y - dy * self.factor)
    }

    fn point(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            self.relative(x, y)
        } else {
            self.absolute(x, y)
        }
    }

    fn move_to(&mut self, p: Point, out: &mut Vec<PathOperation>) {
        self.current = p;
        self.subpath_start = p;
        self.last_control = None;
        out.push(PathOperation::MoveTo(p.x, p.y));
    }

    fn line_to(&mut self, p: Point, out: &mut Vec<PathOperation>) {
        self.current = p;
        self.last_control = None;
        out.push(PathOperation::LineTo(p.x, p.y));
    }

    fn curve_to(&mut self, c1: Point, c2: Point, end: Point, out: &mut Vec<PathOperation>) {
        self.current = end;
        self.last_control = Some(c2);
        out.push(PathOperation::CurveTo(c1.x, c1.y, c2.x, c2.y, end.x, end.y));
    }

    /// First control point of a smooth curve.
    fn reflected_control(&self) -> Point {
        match self.last_control {
            Some(c) => Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }
}

/// Transform an outline to absolute document coordinates.
///
/// `origin` is the glyph's baseline origin in the document, `scale` the font
/// size, `units_per_em` the font's em size.
///
/// # Examples
///
/// ```
/// use single_line_text::geometry::Point;
/// use single_line_text::path::{parse_path_data, transform_outline, PathOperation};
///
/// let outline = parse_path_data("M 0 0 L 500 1000").unwrap();
/// let result = transform_outline(&outline, Point::new(10.0, 50.0), 20.0, 1000.0);
/// assert_eq!(result.operations[0], PathOperation::MoveTo(10.0, 50.0));
/// assert_eq!(result.operations[1], PathOperation::LineTo(20.0, 30.0));
/// ```
pub fn transform_outline(
    commands: &[OutlineCommand],
    origin: Point,
    scale: f64,
    units_per_em: f64,
) -> TransformedOutline {
    let units_per_em = if units_per_em.is_finite() && units_per_em > 0.0 {
        units_per_em
    } else {
        log::warn!("Invalid units-per-em {}, using {}", units_per_em, FALLBACK_UNITS_PER_EM);
        FALLBACK_UNITS_PER_EM
    };

    let mut pen = Pen {
        origin,
        factor: scale / units_per_em,
        current: origin,
        subpath_start: origin,
        last_control: None,
    };
    let mut result = TransformedOutline::default();

    for cmd in commands {
        let Some(arity) = cmd.arity() else {
            skip(&mut result, cmd.letter, "unknown command");
            continue;
        };

        let upper = cmd.letter.to_ascii_uppercase();
        if matches!(upper, 'Q' | 'T' | 'A') {
            skip(&mut result, cmd.letter, "unsupported command type");
            continue;
        }

        if arity == 0 {
            pen.current = pen.subpath_start;
            pen.last_control = None;
            result.operations.push(PathOperation::ClosePath);
            continue;
        }

        if cmd.args.len() < arity {
            skip(&mut result, cmd.letter, "missing arguments");
            continue;
        }

        let relative = cmd.is_relative();
        for (i, group) in cmd.args.chunks(arity).enumerate() {
            if group.len() < arity {
                skip(&mut result, cmd.letter, "incomplete trailing arguments");
                break;
            }
            let ops = &mut result.operations;
            match upper {
                // Extra coordinate pairs after a move are implicit lines.
                'M' if i == 0 => {
                    let p = pen.point(relative, group[0], group[1]);
                    pen.move_to(p, ops);
                },
                'M' | 'L' => {
                    let p = pen.point(relative, group[0], group[1]);
                    pen.line_to(p, ops);
                },
                'H' => {
                    let x = if relative {
                        pen.current.x + group[0] * pen.factor
                    } else {
                        origin.x + group[0] * pen.factor
                    };
                    let p = Point::new(x, pen.current.y);
                    pen.line_to(p, ops);
                },
                'V' => {
                    let y = if relative {
                        pen.current.y - group[0] * pen.factor
                    } else {
                        origin.y - group[0] * pen.factor
                    };
                    let p = Point::new(pen.current.x, y);
                    pen.line_to(p, ops);
                },
                'C' => {
                    let c1 = pen.point(relative, group[0], group[1]);
                    let c2 = pen.point(relative, group[2], group[3]);
                    let end = pen.point(relative, group[4], group[5]);
                    pen.curve_to(c1, c2, end, ops);
                },
                'S' => {
                    let c1 = pen.reflected_control();
                    let c2 = pen.point(relative, group[0], group[1]);
                    let end = pen.point(relative, group[2], group[3]);
                    pen.curve_to(c1, c2, end, ops);
                },
                _ => unreachable!("arity table covers every handled letter"),
            }
        }
    }

    result
}

fn skip(result: &mut TransformedOutline, letter: char, reason: &str) {
    log::debug!("Skipping path command '{}': {}", letter, reason);
    result.skipped.push(SkippedCommand {
        letter,
        reason: reason.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_path_data;

    fn run(d: &str, origin: Point, scale: f64) -> TransformedOutline {
        transform_outline(&parse_path_data(d).unwrap(), origin, scale, 1000.0)
    }

    #[test]
    fn test_absolute_commands_mirror_y() {
        let out = run("M 100 200 L 300 400", Point::new(10.0, 50.0), 1000.0);
        assert_eq!(
            out.operations,
            vec![PathOperation::MoveTo(110.0, -150.0), PathOperation::LineTo(310.0, -350.0)]
        );
    }

    #[test]
    fn test_relative_commands_accumulate() {
        let out = run("m 100 100 l 100 0 l 0 100", Point::origin(), 1000.0);
        assert_eq!(out.operations[0], PathOperation::MoveTo(100.0, -100.0));
        assert_eq!(out.operations[1], PathOperation::LineTo(200.0, -100.0));
        assert_eq!(out.operations[2], PathOperation::LineTo(200.0, -200.0));
    }

    #[test]
    fn test_horizontal_and_vertical_become_lines() {
        let out = run("M 0 0 H 500 v 250 h -100 V 0", Point::new(1.0, 1.0), 1000.0);
        assert_eq!(
            out.operations,
            vec![
                PathOperation::MoveTo(1.0, 1.0),
                PathOperation::LineTo(501.0, 1.0),
                PathOperation::LineTo(501.0, -249.0),
                PathOperation::LineTo(401.0, -249.0),
                PathOperation::LineTo(401.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_cubic_relative_uses_start_point() {
        let out = run("M 10 10 c 10 0 20 10 30 0", Point::origin(), 1000.0);
        assert_eq!(
            out.operations[1],
            PathOperation::CurveTo(20.0, -10.0, 30.0, -20.0, 40.0, -10.0)
        );
    }

    #[test]
    fn test_smooth_reflects_previous_control() {
        let out = run("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0", Point::origin(), 1000.0);
        // Previous c2 = (10, -10), current = (10, 0) -> reflection (10, 10)
        assert_eq!(
            out.operations[2],
            PathOperation::CurveTo(10.0, 10.0, 20.0, 10.0, 20.0, 0.0)
        );
    }

    #[test]
    fn test_smooth_after_line_uses_current_point() {
        let out = run("M 0 0 C 0 10 10 10 10 0 L 20 0 S 30 10 40 0", Point::origin(), 1000.0);
        assert_eq!(
            out.operations[3],
            PathOperation::CurveTo(20.0, 0.0, 30.0, -10.0, 40.0, 0.0)
        );
    }

    #[test]
    fn test_smooth_with_zero_control_point_still_reflects() {
        let out = run("M 0 0 C 5 5 0 0 10 0 S 20 0 30 0", Point::origin(), 1000.0);
        // Previous c2 is exactly (0, 0); reflection about (10, 0) is (20, 0)
        assert_eq!(
            out.operations[2],
            PathOperation::CurveTo(20.0, 0.0, 20.0, 0.0, 30.0, 0.0)
        );
    }

    #[test]
    fn test_unsupported_commands_are_skipped() {
        let out = run("M 0 0 Q 10 10 20 0 L 30 0 A 5 5 0 0 1 40 0", Point::origin(), 1000.0);
        assert_eq!(out.operations.len(), 2);
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].letter, 'Q');
        // Q did not move the current point
        assert_eq!(out.operations[1], PathOperation::LineTo(30.0, 0.0));
    }

    #[test]
    fn test_implicit_repetition() {
        let out = run("M 0 0 10 0 20 0 l 5 5 5 5", Point::origin(), 1000.0);
        assert_eq!(out.operations.len(), 5);
        assert_eq!(out.operations[1], PathOperation::LineTo(10.0, 0.0));
        assert_eq!(out.operations[4], PathOperation::LineTo(30.0, -10.0));
    }

    #[test]
    fn test_incomplete_arguments() {
        let out = run("M 0 0 L 10 10 20", Point::origin(), 1000.0);
        assert_eq!(out.operations.len(), 2);
        assert_eq!(out.skipped.len(), 1);

        let out = run("M 0 0 L", Point::origin(), 1000.0);
        assert_eq!(out.operations.len(), 1);
        assert_eq!(out.skipped[0].reason, "missing arguments");
    }

    #[test]
    fn test_close_path_returns_to_subpath_start() {
        let out = run("M 10 10 L 20 10 Z l 5 0", Point::origin(), 1000.0);
        assert_eq!(out.operations[2], PathOperation::ClosePath);
        assert_eq!(out.operations[3], PathOperation::LineTo(15.0, -10.0));
    }

    #[test]
    fn test_scale_and_units_per_em() {
        let cmds = parse_path_data("M 2048 1024").unwrap();
        let out = transform_outline(&cmds, Point::origin(), 16.0, 2048.0);
        assert_eq!(out.operations[0], PathOperation::MoveTo(16.0, -8.0));
    }
}
