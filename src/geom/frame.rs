//! Photograph dimensions.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::region::Region;

/// Width and height of the photograph detections were made on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Creates a frame from pixel dimensions.
    #[inline]
    pub fn new(width: impl Into<f64>, height: impl Into<f64>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Returns the center of the frame.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns the larger of width and height.
    #[inline]
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Returns the whole frame as a region.
    #[inline]
    pub fn region(&self) -> Region {
        Region::from_xyxy(0.0, 0.0, self.width, self.height)
    }

    /// Returns true if `region` reaches the border of this frame.
    #[inline]
    pub fn is_touched_by(&self, region: &Region) -> bool {
        region.is_touching_frame(self.width, self.height)
    }
}
