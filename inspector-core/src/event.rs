//! Input intents delivered by the gesture layer.
//!
//! Raw touch handling happens outside the engine; what arrives here is
//! already classified as a tap, a long press, or a swipe.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Direction of a navigation swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Toward the parent.
    Up,
    /// Toward the first child.
    Down,
    /// Toward the previous sibling or element.
    Left,
    /// Toward the next sibling or element.
    Right,
}

impl SwipeDirection {
    /// Classify a drag by its dominant axis.
    ///
    /// `dx`/`dy` are in screen coordinates (y grows downward). Returns `None`
    /// when the drag is shorter than `min_distance` on both axes.
    #[must_use]
    pub fn from_delta(dx: f32, dy: f32, min_distance: f32) -> Option<Self> {
        let (ax, ay) = (dx.abs(), dy.abs());
        if ax < min_distance && ay < min_distance {
            return None;
        }
        if ax >= ay {
            Some(if dx < 0.0 { Self::Left } else { Self::Right })
        } else {
            Some(if dy < 0.0 { Self::Up } else { Self::Down })
        }
    }
}

impl std::str::FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown swipe direction: {other}")),
        }
    }
}

/// A classified gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum InspectorGesture {
    /// Single tap.
    Tap {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Long press.
    LongPress {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Navigation swipe.
    Swipe {
        /// Swipe direction.
        direction: SwipeDirection,
    },
}

impl InspectorGesture {
    /// Point of a tap or long press.
    #[must_use]
    pub const fn point(&self) -> Option<Point> {
        match *self {
            Self::Tap { x, y } | Self::LongPress { x, y } => Some(Point::new(x, y)),
            Self::Swipe { .. } => None,
        }
    }
}
