//! Geometric primitives in document space.
//!
//! Document space follows SVG conventions: x grows to the right, y grows
//! downward. Glyph outlines use the opposite y direction and are flipped by
//! [`crate::path::transformer`] before they reach these types.

mod matrix;

pub use matrix::Matrix;

/// Tolerance used by the approximate comparisons in this module.
pub const EPSILON: f64 = 1e-9;

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// An axis-aligned rectangle in document space.
///
/// Used for both flavors of bounding box: the *target* box estimated for the
/// original text and the *generated* box measured from rasterized glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f64,
    /// Y coordinate of top-left corner
    pub y: f64,
    /// Width of rectangle
    pub width: f64,
    /// Height of rectangle
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The zero box at the origin, returned when nothing was measured.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty set.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_points(min_x, min_y, max_x, max_y))
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when the box collapsed on either axis or holds non-finite values.
    ///
    /// A collapsed generated box is the distinguishable failure state of a
    /// rasterization that produced no measurable strokes.
    pub fn is_degenerate(&self) -> bool {
        !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
            || self.width.abs() <= EPSILON
            || self.height.abs() <= EPSILON
    }

    /// Scale the rectangle about its own center.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0).scaled_about_center(0.5);
    /// assert_eq!(rect.x, 25.0);
    /// assert_eq!(rect.y, 12.5);
    /// assert_eq!(rect.width, 50.0);
    /// ```
    pub fn scaled_about_center(&self, factor: f64) -> Rect {
        let c = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Rect::new(c.x - width / 2.0, c.y - height / 2.0, width, height)
    }

    /// Move the rectangle by (dx, dy).
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Map the rectangle through an axis-aligned matrix.
    pub fn transformed(&self, m: &Matrix) -> Rect {
        let p0 = m.transform_point(self.left(), self.top());
        let p1 = m.transform_point(self.right(), self.bottom());
        Rect::enclosing([p0, p1]).unwrap_or_default()
    }

    /// Compare two rectangles component-wise within `tolerance`.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}
