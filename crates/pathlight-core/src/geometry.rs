//! Geometric primitives for overlay placement.
//!
//! This module provides the small set of geometric types Pathlight needs to
//! compute bounding boxes of rendered nodes and to place highlight overlays
//! around them.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Pathlight uses the SVG user coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use pathlight_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates the smallest bounds containing both points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Creates the smallest bounds containing every point, or `None` for an
    /// empty iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pathlight_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::enclosing([
    ///     Point::new(3.0, 4.0),
    ///     Point::new(-1.0, 10.0),
    ///     Point::new(5.0, 0.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(bounds.min_x(), -1.0);
    /// assert_eq!(bounds.max_y(), 10.0);
    ///
    /// assert!(Bounds::enclosing(Vec::new()).is_none());
    /// ```
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_corners(first, first), |acc, point| {
            acc.merge(&Self::from_corners(point, point))
        }))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pathlight_core::geometry::{Bounds, Point, Size};
    /// let label = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let shape = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = label.merge(&shape);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Expands the bounds by adding insets.
    ///
    /// This decreases the minimum coordinates by left/top insets and increases
    /// the maximum coordinates by right/bottom insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), point_strategy()).prop_map(|(a, b)| Bounds::from_corners(a, b))
    }

    /// Merged bounds contain both inputs.
    fn check_merge_contains_both(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);
        for inner in [a, b] {
            prop_assert!(merged.min_x() <= inner.min_x());
            prop_assert!(merged.min_y() <= inner.min_y());
            prop_assert!(merged.max_x() >= inner.max_x());
            prop_assert!(merged.max_y() >= inner.max_y());
        }
        Ok(())
    }

    /// Uniform padding grows width and height by twice the padding.
    fn check_padding_grows_size(bounds: Bounds, padding: f32) -> Result<(), TestCaseError> {
        let padded = bounds.add_padding(Insets::uniform(padding));
        prop_assert!(approx_eq!(
            f32,
            padded.width(),
            bounds.width() + 2.0 * padding,
            epsilon = 0.01
        ));
        prop_assert!(approx_eq!(
            f32,
            padded.height(),
            bounds.height() + 2.0 * padding,
            epsilon = 0.01
        ));
        Ok(())
    }

    proptest! {
        #[test]
        fn merge_contains_both(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_both(a, b)?;
        }

        #[test]
        fn padding_grows_size(bounds in bounds_strategy(), padding in 0.0f32..50.0) {
            check_padding_grows_size(bounds, padding)?;
        }
    }
}
