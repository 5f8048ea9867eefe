//! Screen-space geometry primitives.
//!
//! All coordinates are in screen pixels with the origin at the top-left and
//! y growing downward. Rectangle equality is exact (`f32 ==` on every edge);
//! hierarchy inference depends on that, so no tolerance is ever applied.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X position in pixels.
    pub x: f32,
    /// Y position in pixels.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle described by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[must_use]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Area in square pixels. Degenerate rectangles report zero.
    #[must_use]
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// True when the rectangle has no positive area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Written as negations so NaN edges also count as empty.
        !(self.left < self.right && self.top < self.bottom)
    }

    /// True when every edge is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Check whether a point falls inside the rectangle.
    ///
    /// Left and top edges are inclusive, right and bottom exclusive, so two
    /// abutting rectangles never both claim the shared edge. Empty
    /// rectangles contain nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.left
            && point.x < self.right
            && point.y >= self.top
            && point.y < self.bottom
    }

    /// True when the x-extents of both rectangles share a positive-length interval.
    #[must_use]
    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        self.left.max(other.left) < self.right.min(other.right)
    }

    /// True when the y-extents of both rectangles share a positive-length interval.
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Self) -> bool {
        self.top.max(other.top) < self.bottom.min(other.bottom)
    }

    /// Display ordering: top edge first, then left edge.
    ///
    /// Used for sibling order and DFS order alike.
    #[must_use]
    pub fn position_cmp(&self, other: &Self) -> Ordering {
        self.top
            .total_cmp(&other.top)
            .then_with(|| self.left.total_cmp(&other.left))
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<Rect> for Size {
    fn from(rect: Rect) -> Self {
        Self::new(rect.width(), rect.height())
    }
}

/// Per-edge spacing such as margins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    /// Left inset.
    pub left: f32,
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
}

impl Insets {
    /// Create insets from explicit edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on every edge.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// True when every edge is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
