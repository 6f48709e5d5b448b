//! Grid and continuous 2-D geometry.
//!
//! Two coordinate types are used throughout the engine:
//!
//! - [`GridPoint`]: an integer cell index `(x, y)`.  `x` grows to the right,
//!   `y` grows downward (row index).
//! - [`Point`]: a continuous `f32` position.  In grid space the cell
//!   `(x, y)` covers `[x, x+1) × [y, y+1)` and its centre is `(x+0.5, y+0.5)`.
//!   The same type carries local-space positions once scaled by a map layout.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

// ── GridPoint ─────────────────────────────────────────────────────────────────

/// An integer cell coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre of this cell in continuous grid space.
    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// The cell offset by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Orthogonal unit steps in fixed order: right, left, down, up.
    pub const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    /// Diagonal unit steps in fixed order.
    pub const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── Point ─────────────────────────────────────────────────────────────────────

/// A continuous 2-D position or displacement.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of this vector.
    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// The grid cell containing this point (floor of each component).
    #[inline]
    pub fn cell(self) -> GridPoint {
        GridPoint::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// `true` when both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise multiply (used for cell-size scaling).
    #[inline]
    pub fn scale(self, by: Point) -> Point {
        Point::new(self.x * by.x, self.y * by.y)
    }

    /// Component-wise divide.
    #[inline]
    pub fn unscale(self, by: Point) -> Point {
        Point::new(self.x / by.x, self.y / by.y)
    }

    /// Component-wise approximate equality.
    #[inline]
    pub fn approx_eq(self, other: Point, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;
    #[inline]
    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl From<GridPoint> for Point {
    /// The cell's top-left corner, not its centre.  Use
    /// [`GridPoint::center`] for the centre.
    #[inline]
    fn from(p: GridPoint) -> Point {
        Point::new(p.x as f32, p.y as f32)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Size ──────────────────────────────────────────────────────────────────────

/// A width/height pair.  `Size<i32>` is a grid dimension, `Size<f32>` a cell
/// or rectangle extent in local space.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size<T> {
    pub width:  T,
    pub height: T,
}

impl<T> Size<T> {
    #[inline]
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl Size<i32> {
    /// Number of cells covered.  Zero for any non-positive dimension.
    #[inline]
    pub fn area(self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// The smaller of the two dimensions.
    #[inline]
    pub fn min_dimension(self) -> i32 {
        self.width.min(self.height)
    }
}

impl Size<f32> {
    /// Mean of width and height: the scalar used to convert distances and
    /// speeds between grid and local space.
    #[inline]
    pub fn mean(self) -> f32 {
        (self.width + self.height) / 2.0
    }

    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl<T: fmt::Display> fmt::Display for Size<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
