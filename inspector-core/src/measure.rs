//! # Distance Diagrams
//!
//! Computes the callout lines a designer would draw between two
//! rectangles. The relationship is classified by which axes overlap:
//!
//! ```text
//!  both axes             x only              y only           neither
//! ┌──────┐           ┌──────┐           ┌────┐   ┌────┐    ┌───┐
//! │ ┌──┐ │           │  P   │           │ P  │◀─▶│ S  │    │ P │──┐
//! │ │S │ │           └──┬───┘           └────┘   └────┘    └─┬─┘  │
//! │ └──┘ │              ▼                                    │  ┌─▼─┐
//! └──────┘           ┌──────┐                                └─▶│ S │
//!  edge-to-edge      │  S   │                                   └───┘
//!                    └──────┘
//! ```
//!
//! Every segment carries a non-negative magnitude; segments whose magnitude
//! is exactly zero are dropped, so identical rectangles produce nothing.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Orientation of a distance segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Measured along x.
    Horizontal,
    /// Measured along y.
    Vertical,
}

/// One callout line with its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSegment {
    /// Where the line starts.
    pub start: Point,
    /// Where the line ends.
    pub end: Point,
    /// Absolute distance in pixels, always positive.
    pub value: f32,
    /// Axis the distance is measured along.
    pub axis: Axis,
}

impl DistanceSegment {
    fn horizontal(y: f32, from_x: f32, to_x: f32) -> Option<Self> {
        let value = (to_x - from_x).abs();
        (value > 0.0).then(|| Self {
            start: Point::new(from_x, y),
            end: Point::new(to_x, y),
            value,
            axis: Axis::Horizontal,
        })
    }

    fn vertical(x: f32, from_y: f32, to_y: f32) -> Option<Self> {
        let value = (to_y - from_y).abs();
        (value > 0.0).then(|| Self {
            start: Point::new(x, from_y),
            end: Point::new(x, to_y),
            value,
            axis: Axis::Vertical,
        })
    }
}

/// How two rectangles relate, by which axes they overlap on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapKind {
    /// Overlapping on both axes.
    Both,
    /// Sharing x-extent, separated vertically.
    HorizontalOnly,
    /// Sharing y-extent, separated horizontally.
    VerticalOnly,
    /// Separated on both axes.
    Disjoint,
}

impl OverlapKind {
    /// Classify two rectangles.
    #[must_use]
    pub fn classify(a: &Rect, b: &Rect) -> Self {
        match (a.overlaps_horizontally(b), a.overlaps_vertically(b)) {
            (true, true) => Self::Both,
            (true, false) => Self::HorizontalOnly,
            (false, true) => Self::VerticalOnly,
            (false, false) => Self::Disjoint,
        }
    }
}

/// Midpoint of the shared interval, or of the longer interval if they
/// do not share one.
fn overlap_mid(a_lo: f32, a_hi: f32, b_lo: f32, b_hi: f32) -> f32 {
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);
    if lo < hi {
        (lo + hi) / 2.0
    } else if a_hi - a_lo >= b_hi - b_lo {
        (a_lo + a_hi) / 2.0
    } else {
        (b_lo + b_hi) / 2.0
    }
}

/// Distance diagram between a primary and a secondary rectangle.
///
/// Returns at most four segments. Empty when either rectangle has no
/// positive area.
#[must_use]
pub fn relative_distances(primary: &Rect, secondary: &Rect) -> Vec<DistanceSegment> {
    if primary.is_empty() || secondary.is_empty() {
        return Vec::new();
    }

    let (p, s) = (primary, secondary);
    let segments = match OverlapKind::classify(p, s) {
        OverlapKind::Both => {
            let x = overlap_mid(p.left, p.right, s.left, s.right);
            let y = overlap_mid(p.top, p.bottom, s.top, s.bottom);
            [
                DistanceSegment::vertical(x, p.top, s.top),
                DistanceSegment::vertical(x, p.bottom, s.bottom),
                DistanceSegment::horizontal(y, p.left, s.left),
                DistanceSegment::horizontal(y, p.right, s.right),
            ]
        }
        OverlapKind::HorizontalOnly => {
            let (upper, lower) = if p.bottom <= s.top { (p, s) } else { (s, p) };
            let x = overlap_mid(p.left, p.right, s.left, s.right);
            let y = (upper.bottom + lower.top) / 2.0;
            [
                DistanceSegment::vertical(x, upper.bottom, lower.top),
                DistanceSegment::horizontal(y, p.left, s.left),
                DistanceSegment::horizontal(y, p.right, s.right),
                None,
            ]
        }
        OverlapKind::VerticalOnly => {
            let (leftmost, rightmost) = if p.right <= s.left { (p, s) } else { (s, p) };
            let x = (leftmost.right + rightmost.left) / 2.0;
            let y = overlap_mid(p.top, p.bottom, s.top, s.bottom);
            [
                DistanceSegment::horizontal(y, leftmost.right, rightmost.left),
                DistanceSegment::vertical(x, p.top, s.top),
                DistanceSegment::vertical(x, p.bottom, s.bottom),
                None,
            ]
        }
        OverlapKind::Disjoint => {
            let (from_x, to_x) = if p.right <= s.left {
                (p.right, s.left)
            } else {
                (p.left, s.right)
            };
            let (from_y, to_y) = if p.bottom <= s.top {
                (p.bottom, s.top)
            } else {
                (p.top, s.bottom)
            };
            [
                DistanceSegment::horizontal(p.center_y(), from_x, to_x),
                DistanceSegment::vertical(p.center_x(), from_y, to_y),
                None,
                None,
            ]
        }
    };

    segments.into_iter().flatten().collect()
}

/// Spacing between a child and its parent, one segment per edge.
///
/// Each segment runs from the parent's edge to the matching child edge along
/// the child's center line. Edges that touch are omitted.
#[must_use]
pub fn distances_to_parent(child: &Rect, parent: &Rect) -> Vec<DistanceSegment> {
    if child.is_empty() || parent.is_empty() {
        return Vec::new();
    }

    let (cx, cy) = (child.center_x(), child.center_y());
    [
        DistanceSegment::vertical(cx, parent.top, child.top),
        DistanceSegment::vertical(cx, child.bottom, parent.bottom),
        DistanceSegment::horizontal(cy, parent.left, child.left),
        DistanceSegment::horizontal(cy, child.right, parent.right),
    ]
    .into_iter()
    .flatten()
    .collect()
}
