//! Glyph outline commands and absolute path operations.
//!
//! Outlines come in as SVG path data in font units ([`data`]), are mapped to
//! absolute document coordinates by [`transformer`], and leave as a list of
//! [`PathOperation`]s that serialize back to SVG path data.

pub mod data;
pub mod transformer;

pub use data::{parse_path_data, OutlineCommand};
pub use transformer::{transform_outline, SkippedCommand, TransformedOutline};

use crate::geometry::Point;
use std::fmt::Write as _;

/// A single absolute path operation in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOperation {
    /// Move to a point (M)
    MoveTo(f64, f64),
    /// Line to a point (L)
    LineTo(f64, f64),
    /// Cubic Bezier curve to a point (C)
    /// (control1_x, control1_y, control2_x, control2_y, end_x, end_y)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Close the current subpath (Z)
    ClosePath,
}

impl PathOperation {
    /// End point of the operation, if it has one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathOperation::MoveTo(x, y) | PathOperation::LineTo(x, y) => Some(Point::new(x, y)),
            PathOperation::CurveTo(_, _, _, _, x, y) => Some(Point::new(x, y)),
            PathOperation::ClosePath => None,
        }
    }

    /// Point introduced by a Move or Line; curves and closes yield `None`.
    pub fn vertex(&self) -> Option<Point> {
        match *self {
            PathOperation::MoveTo(x, y) | PathOperation::LineTo(x, y) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Format a coordinate for path data: shortest round-trip form, no `-0`.
pub fn format_number(value: f64) -> String {
    // -0.0 + 0.0 == +0.0
    format!("{}", value + 0.0)
}

/// Serialize operations as SVG path data (`M x y L x y C ...`).
///
/// # Examples
///
/// ```
/// use single_line_text::path::{to_path_data, PathOperation};
///
/// let d = to_path_data(&[PathOperation::MoveTo(0.0, 1.5), PathOperation::LineTo(2.0, -0.0)]);
/// assert_eq!(d, "M 0 1.5 L 2 0");
/// ```
pub fn to_path_data(operations: &[PathOperation]) -> String {
    let mut out = String::new();
    for op in operations {
        if !out.is_empty() {
            out.push(' ');
        }
        match *op {
            PathOperation::MoveTo(x, y) => {
                let _ = write!(out, "M {} {}", format_number(x), format_number(y));
            },
            PathOperation::LineTo(x, y) => {
                let _ = write!(out, "L {} {}", format_number(x), format_number(y));
            },
            PathOperation::CurveTo(x1, y1, x2, y2, x3, y3) => {
                let _ = write!(
                    out,
                    "C {} {} {} {} {} {}",
                    format_number(x1),
                    format_number(y1),
                    format_number(x2),
                    format_number(y2),
                    format_number(x3),
                    format_number(y3)
                );
            },
            PathOperation::ClosePath => out.push('Z'),
        }
    }
    out
}
