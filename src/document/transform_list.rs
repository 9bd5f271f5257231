//! SVG `transform` attribute parsing and ancestor composition.
//!
//! Supported functions: `matrix`, `translate`, `scale`, `rotate`, `skewX`,
//! `skewY`. Rotation and skew are detected but not applied: they contribute
//! nothing to the composed transform, and a `matrix` with off-diagonal terms
//! keeps only its scale and translation.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::geometry::{Matrix, EPSILON};
use nom::{
    IResult,
    bytes::complete::take_while,
    character::complete::{alpha1, char},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, preceded},
};

/// One function of a transform list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformFunction {
    /// `matrix(a b c d e f)`
    Matrix(Matrix),
    /// `translate(tx [ty])`
    Translate(f64, f64),
    /// `scale(sx [sy])`
    Scale(f64, f64),
    /// `rotate(angle [cx cy])`, angle in degrees
    Rotate(f64, f64, f64),
    /// `skewX(angle)`
    SkewX(f64),
    /// `skewY(angle)`
    SkewY(f64),
}

impl TransformFunction {
    /// Full affine matrix of the function, rotation and skew included.
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            TransformFunction::Matrix(m) => m,
            TransformFunction::Translate(tx, ty) => Matrix::translation(tx, ty),
            TransformFunction::Scale(sx, sy) => Matrix::scaling(sx, sy),
            TransformFunction::Rotate(angle, cx, cy) => {
                let (sin, cos) = angle.to_radians().sin_cos();
                Matrix::translation(-cx, -cy)
                    .multiply(&Matrix::new(cos, sin, -sin, cos, 0.0, 0.0))
                    .multiply(&Matrix::translation(cx, cy))
            },
            TransformFunction::SkewX(angle) => {
                Matrix::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
            },
            TransformFunction::SkewY(angle) => {
                Matrix::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
            },
        }
    }

    /// True when the function rotates or skews.
    pub fn has_rotation(&self) -> bool {
        match *self {
            TransformFunction::Matrix(m) => m.has_shear(),
            TransformFunction::Rotate(angle, _, _) => (angle % 360.0).abs() > EPSILON,
            TransformFunction::SkewX(angle) | TransformFunction::SkewY(angle) => {
                angle.abs() > EPSILON
            },
            _ => false,
        }
    }

    /// Scale and translation part only.
    pub fn axis_aligned_matrix(&self) -> Matrix {
        match *self {
            TransformFunction::Matrix(m) => m.axis_aligned(),
            TransformFunction::Rotate(..)
            | TransformFunction::SkewX(_)
            | TransformFunction::SkewY(_) => Matrix::identity(),
            _ => self.to_matrix(),
        }
    }
}

/// Parse a transform attribute value.
///
/// # Examples
///
/// ```
/// use single_line_text::document::transform_list::{parse_transform_list, TransformFunction};
///
/// let list = parse_transform_list("translate(10,20) scale(2)").unwrap();
/// assert_eq!(list, vec![TransformFunction::Translate(10.0, 20.0), TransformFunction::Scale(2.0, 2.0)]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Transform`] for unknown functions, wrong argument
/// counts, or trailing garbage.
pub fn parse_transform_list(input: &str) -> Result<Vec<TransformFunction>> {
    let (rest, raw) = many0(preceded(separators, function))(input)
        .map_err(|e| Error::Transform(format!("{:?}", e)))?;
    let (rest, _) = separators(rest).map_err(|e| Error::Transform(format!("{:?}", e)))?;
    if !rest.is_empty() {
        return Err(Error::Transform(format!("unexpected input {:?}", rest)));
    }

    raw.into_iter()
        .map(|(name, args)| build_function(name, &args))
        .collect()
}

fn build_function(name: &str, args: &[f64]) -> Result<TransformFunction> {
    let function = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => TransformFunction::Matrix(Matrix::new(a, b, c, d, e, f)),
        ("translate", &[tx]) => TransformFunction::Translate(tx, 0.0),
        ("translate", &[tx, ty]) => TransformFunction::Translate(tx, ty),
        ("scale", &[s]) => TransformFunction::Scale(s, s),
        ("scale", &[sx, sy]) => TransformFunction::Scale(sx, sy),
        ("rotate", &[angle]) => TransformFunction::Rotate(angle, 0.0, 0.0),
        ("rotate", &[angle, cx, cy]) => TransformFunction::Rotate(angle, cx, cy),
        ("skewX", &[angle]) => TransformFunction::SkewX(angle),
        ("skewY", &[angle]) => TransformFunction::SkewY(angle),
        _ => {
            return Err(Error::Transform(format!(
                "{}() with {} arguments",
                name,
                args.len()
            )))
        },
    };
    Ok(function)
}

/// Skip whitespace and commas.
fn separators(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    let (rest, text) = preceded(separators, recognize_float)(input)?;
    let value = text.parse::<f64>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, value))
}

/// `name ( args )`
fn function(input: &str) -> IResult<&str, (&str, Vec<f64>)> {
    let (rest, name) = alpha1(input)?;
    let (rest, args) = delimited(
        preceded(separators, char('(')),
        many0(number),
        preceded(separators, char(')')),
    )(rest)?;
    Ok((rest, (name, args)))
}

/// Net transform of one attribute value, ignoring rotation and skew.
///
/// Returns the matrix and whether any rotation or skew was dropped.
pub fn axis_aligned_transform(functions: &[TransformFunction]) -> (Matrix, bool) {
    // In "A B" the rightmost function is applied first.
    let matrix = functions
        .iter()
        .rev()
        .fold(Matrix::identity(), |m, f| m.multiply(&f.axis_aligned_matrix()));
    let rotated = functions.iter().any(TransformFunction::has_rotation);
    (matrix, rotated)
}

/// A node in an ancestor chain that may declare a transform.
///
/// Lets transform composition run over any tree: a node exposes its raw
/// transform declaration and its parent.
pub trait AncestorChain: Sized + Clone {
    /// Raw `transform` declaration, if any.
    fn transform_declaration(&self) -> Option<&str>;

    /// Parent node, or `None` at the top.
    fn parent_node(&self) -> Option<Self>;

    /// Short label for diagnostics (id or tag name).
    fn label(&self) -> String;
}

/// Compose the transforms of `node` and every ancestor.
///
/// The node's own transform is applied first, then its parent's, up to the
/// root. Rotation and skew anywhere in the chain are dropped and reported
/// once per element; unparseable declarations are ignored and logged.
pub fn cumulative_transform<N: AncestorChain>(node: &N, diagnostics: &mut Diagnostics) -> Matrix {
    let mut total = Matrix::identity();
    let mut current = Some(node.clone());

    while let Some(n) = current {
        if let Some(declaration) = n.transform_declaration() {
            match parse_transform_list(declaration) {
                Ok(functions) => {
                    let (local, rotated) = axis_aligned_transform(&functions);
                    if rotated {
                        let diagnostic = Diagnostic::RotationDetected { element: n.label() };
                        if !diagnostics.contains(&diagnostic) {
                            diagnostics.push(diagnostic);
                        }
                    }
                    total = total.multiply(&local);
                },
                Err(e) => {
                    log::warn!("Ignoring transform on {}: {}", n.label(), e);
                },
            }
        }
        current = n.parent_node();
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Chain<'a> {
        levels: &'a [(&'a str, Option<&'a str>)],
        index: usize,
    }

    impl AncestorChain for Chain<'_> {
        fn transform_declaration(&self) -> Option<&str> {
            self.levels[self.index].1
        }

        fn parent_node(&self) -> Option<Self> {
            (self.index + 1 < self.levels.len()).then(|| Chain {
                levels: self.levels,
                index: self.index + 1,
            })
        }

        fn label(&self) -> String {
            self.levels[self.index].0.to_string()
        }
    }

    #[test]
    fn test_parse_all_functions() {
        let list =
            parse_transform_list("matrix(1 0 0 1 5 5), translate(3) scale(2,3) rotate(45 1 1) skewX(10) skewY(-5)")
                .unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(list[1], TransformFunction::Translate(3.0, 0.0));
        assert_eq!(list[2], TransformFunction::Scale(2.0, 3.0));
        assert_eq!(list[3], TransformFunction::Rotate(45.0, 1.0, 1.0));
        assert_eq!(list[5], TransformFunction::SkewY(-5.0));
    }

    #[test]
    fn test_parse_empty_and_whitespace() {
        assert!(parse_transform_list("").unwrap().is_empty());
        assert!(parse_transform_list("  ").unwrap().is_empty());
        assert_eq!(
            parse_transform_list(" translate ( -1.5e1 , .5 ) ").unwrap(),
            vec![TransformFunction::Translate(-15.0, 0.5)]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_transform_list("shear(1)"), Err(Error::Transform(_))));
        assert!(matches!(parse_transform_list("matrix(1 2 3)"), Err(Error::Transform(_))));
        assert!(matches!(parse_transform_list("scale(2"), Err(Error::Transform(_))));
        assert!(matches!(parse_transform_list("scale(2) junk"), Err(Error::Transform(_))));
    }

    #[test]
    fn test_list_applies_rightmost_first() {
        let list = parse_transform_list("translate(10,0) scale(2)").unwrap();
        let (m, rotated) = axis_aligned_transform(&list);
        assert!(!rotated);
        let p = m.transform_point(1.0, 1.0);
        assert_eq!((p.x, p.y), (12.0, 2.0));
    }

    #[test]
    fn test_rotation_is_flagged_and_dropped() {
        let list = parse_transform_list("translate(5,5) rotate(30)").unwrap();
        let (m, rotated) = axis_aligned_transform(&list);
        assert!(rotated);
        assert!(m.approx_eq(&Matrix::translation(5.0, 5.0), 1e-12));

        let sheared = parse_transform_list("matrix(2 0.5 0 3 1 1)").unwrap();
        let (m, rotated) = axis_aligned_transform(&sheared);
        assert!(rotated);
        assert_eq!(m, Matrix::new(2.0, 0.0, 0.0, 3.0, 1.0, 1.0));

        assert!(!TransformFunction::Rotate(360.0, 0.0, 0.0).has_rotation());
    }

    #[test]
    fn test_rotate_matrix_about_centre() {
        let m = TransformFunction::Rotate(90.0, 10.0, 0.0).to_matrix();
        let p = m.transform_point(20.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_three_levels() {
        let levels = [
            ("text", None),
            ("g3", Some("matrix(1,0,0,1,5,5)")),
            ("g2", Some("scale(2)")),
            ("g1", Some("translate(10,20)")),
        ];
        let mut diagnostics = Diagnostics::new();
        let m = cumulative_transform(&Chain { levels: &levels, index: 0 }, &mut diagnostics);
        assert!(m.approx_eq(&Matrix::new(2.0, 0.0, 0.0, 2.0, 20.0, 30.0), 1e-12));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_cumulative_reports_rotation_and_skips_garbage() {
        let levels = [
            ("text", Some("not a transform")),
            ("tilted", Some("rotate(15) scale(3)")),
        ];
        let mut diagnostics = Diagnostics::new();
        let m = cumulative_transform(&Chain { levels: &levels, index: 0 }, &mut diagnostics);
        assert!(m.approx_eq(&Matrix::scaling(3.0, 3.0), 1e-12));
        assert_eq!(
            diagnostics.entries(),
            &[Diagnostic::RotationDetected {
                element: "tilted".to_string()
            }]
        );
    }
}
