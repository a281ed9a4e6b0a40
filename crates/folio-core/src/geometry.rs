#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are page pixels as `f64`, origin at the top-left corner.
//! Nothing here rounds; snapping to integer pixels is left to the renderer.

use serde::{Deserialize, Serialize};

/// A pointer or anchor position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Monotonic in the true distance, so it is enough for nearest-point
    /// comparisons without a square root.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Orientation of a split.
///
/// `Horizontal` places children side by side (divides width);
/// `Vertical` stacks them (divides height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

impl SplitAxis {
    /// Length of `bounds` along this axis.
    #[inline]
    pub const fn extent(self, bounds: &Bounds) -> f64 {
        match self {
            Self::Horizontal => bounds.width,
            Self::Vertical => bounds.height,
        }
    }

    /// Start coordinate of `bounds` along this axis.
    #[inline]
    pub const fn origin(self, bounds: &Bounds) -> f64 {
        match self {
            Self::Horizontal => bounds.left,
            Self::Vertical => bounds.top,
        }
    }

    /// Coordinate of `point` along this axis.
    #[inline]
    pub const fn coordinate(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }
}

/// One side of a rectangle.
///
/// Declaration order is the tie-break order used by edge hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges in tie-break order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Split axis implied by inserting along this edge.
    #[inline]
    pub const fn axis(self) -> SplitAxis {
        match self {
            Self::Top | Self::Bottom => SplitAxis::Vertical,
            Self::Left | Self::Right => SplitAxis::Horizontal,
        }
    }

    /// Whether content inserted at this edge goes after the existing region.
    #[inline]
    pub const fn is_after(self) -> bool {
        matches!(self, Self::Bottom | Self::Right)
    }

    /// The edge on the opposite side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create new bounds.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds anchored at the origin.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Build bounds from edge coordinates.
    #[inline]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Centre point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if the bounds have zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Smallest bounds containing both rectangles.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Midpoint of one edge.
    pub fn edge_midpoint(&self, edge: Edge) -> Point {
        let center = self.center();
        match edge {
            Edge::Top => Point::new(center.x, self.top),
            Edge::Bottom => Point::new(center.x, self.bottom()),
            Edge::Left => Point::new(self.left, center.y),
            Edge::Right => Point::new(self.right(), center.y),
        }
    }

    /// Divide along `axis`, giving `fraction` of the extent to the first part.
    ///
    /// The cross extent is inherited unchanged by both parts.
    pub fn split(&self, axis: SplitAxis, fraction: f64) -> (Bounds, Bounds) {
        match axis {
            SplitAxis::Horizontal => {
                let first = self.width * fraction;
                let second = self.width * (1.0 - fraction);
                (
                    Bounds::new(self.left, self.top, first, self.height),
                    Bounds::new(self.left + first, self.top, second, self.height),
                )
            }
            SplitAxis::Vertical => {
                let first = self.height * fraction;
                let second = self.height * (1.0 - fraction);
                (
                    Bounds::new(self.left, self.top, self.width, first),
                    Bounds::new(self.left, self.top + first, self.width, second),
                )
            }
        }
    }
}
