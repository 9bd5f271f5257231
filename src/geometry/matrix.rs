//! 2D affine transformation matrix.

use super::{Point, EPSILON};

/// A 2D transformation matrix.
///
/// SVG `matrix(a, b, c, d, e, f)` uses the same layout:
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
///
/// Where (a,b,c,d) define scaling/rotation/skewing and (e,f) define translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component
    pub a: f64,
    /// Rotation/skew component
    pub b: f64,
    /// Rotation/skew component
    pub c: f64,
    /// Vertical scaling component
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Matrix {
    /// Create an identity matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Matrix;
    ///
    /// let m = Matrix::identity();
    /// assert_eq!(m.a, 1.0);
    /// assert_eq!(m.d, 1.0);
    /// assert_eq!(m.e, 0.0);
    /// assert_eq!(m.f, 0.0);
    /// ```
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Create a matrix from its six SVG components.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create a translation matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Matrix;
    ///
    /// let m = Matrix::translation(10.0, 20.0);
    /// assert_eq!(m.e, 10.0);
    /// assert_eq!(m.f, 20.0);
    /// ```
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    /// Create a scaling matrix.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Multiply this matrix with another matrix.
    ///
    /// The result represents first applying `self`, then applying `other`.
    /// An SVG transform list `"A B"` therefore equals `B.multiply(&A)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Matrix;
    ///
    /// let m = Matrix::scaling(2.0, 2.0).multiply(&Matrix::translation(10.0, 0.0));
    /// let p = m.transform_point(1.0, 1.0);
    /// assert_eq!(p.x, 12.0);
    /// assert_eq!(p.y, 2.0);
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point using this matrix.
    pub fn transform_point(&self, x: f64, y: f64) -> Point {
        Point {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// Get the determinant of this matrix.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// True when the off-diagonal terms are non-zero (rotation or skew).
    pub fn has_shear(&self) -> bool {
        self.b.abs() > EPSILON || self.c.abs() > EPSILON
    }

    /// The same matrix with rotation and skew terms dropped.
    pub fn axis_aligned(&self) -> Matrix {
        Matrix {
            b: 0.0,
            c: 0.0,
            ..*self
        }
    }

    /// Horizontal scale factor of an axis-aligned matrix.
    pub fn scale_x(&self) -> f64 {
        self.a
    }

    /// Vertical scale factor of an axis-aligned matrix.
    pub fn scale_y(&self) -> f64 {
        self.d
    }

    /// Compare component-wise within `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        (self.a - other.a).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.c - other.c).abs() <= tolerance
            && (self.d - other.d).abs() <= tolerance
            && (self.e - other.e).abs() <= tolerance
            && (self.f - other.f).abs() <= tolerance
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_translation() {
        let m = Matrix::translation(10.0, 20.0);
        let p = m.transform_point(5.0, 10.0);
        assert_eq!(p.x, 15.0);
        assert_eq!(p.y, 30.0);
    }

    #[test]
    fn test_matrix_multiply() {
        let m1 = Matrix::translation(10.0, 20.0);
        let m2 = Matrix::scaling(2.0, 2.0);
        let result = m1.multiply(&m2);

        // translate first, then scale
        let p = result.transform_point(5.0, 5.0);
        assert_eq!(p.x, 30.0);
        assert_eq!(p.y, 50.0);
    }

    #[test]
    fn test_matrix_multiply_order() {
        let m1 = Matrix::translation(10.0, 0.0);
        let m2 = Matrix::scaling(2.0, 1.0);

        let p1 = m1.multiply(&m2).transform_point(5.0, 0.0);
        let p2 = m2.multiply(&m1).transform_point(5.0, 0.0);
        assert_ne!(p1.x, p2.x);
    }

    #[test]
    fn test_shear_detection() {
        assert!(!Matrix::scaling(2.0, 3.0).has_shear());
        let rotated = Matrix::new(0.0, 1.0, -1.0, 0.0, 4.0, 5.0);
        assert!(rotated.has_shear());
        let stripped = rotated.axis_aligned();
        assert!(!stripped.has_shear());
        assert_eq!(stripped.e, 4.0);
        assert_eq!(stripped.f, 5.0);
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Matrix::scaling(2.0, 3.0).determinant(), 6.0);
        assert_eq!(Matrix::identity().determinant(), 1.0);
    }
}
