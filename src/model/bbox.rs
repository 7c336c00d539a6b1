//! Pixel bounding boxes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangle on the scanned page, in pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.left as f64 + self.width() as f64 / 2.0
    }

    /// Check whether `other` lies entirely inside this box (edges inclusive).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Check whether the two boxes overlap. Boxes that only touch do not.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.left >= other.right
            || other.left >= self.right
            || self.top >= other.bottom
            || other.top >= self.bottom)
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Formats as the hOCR `bbox` property: `bbox l t r b`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bbox {} {} {} {}",
            self.left, self.top, self.right, self.bottom
        )
    }
}
