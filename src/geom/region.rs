//! Axis-aligned regions in canonical XYXY format.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::point::Point;
use super::space::{Normalized, Pixel};
use crate::collab::Raster;

/// An axis-aligned rectangle in XYXY format (x1, y1, x2, y2).
///
/// The `TSpace` parameter is either [`Pixel`] (the default) or
/// [`Normalized`], so boxes from detectors that report fractions of the
/// frame cannot be mixed with pixel boxes by accident.
///
/// Regions are values: every operation returns a new region. The
/// constructors do NOT enforce `x1 <= x2` and `y1 <= y2`; growing by a
/// negative margin or combining odd detector output can produce an
/// inverted region, and [`Region::is_ordered`] reports that instead of the
/// constructor rejecting it.
#[derive(Clone, Copy, PartialEq)]
pub struct Region<TSpace = Pixel> {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Region<TSpace> {
    /// Creates a region from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            _space: PhantomData,
        }
    }

    /// Creates a region from its upper-left corner and size.
    #[inline]
    pub fn from_upper_left(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Creates the axis-aligned bounding region of a detected quad.
    ///
    /// The corners may arrive in any order (fiducial detectors report them
    /// clockwise from the marker's own top-left, which rotates with the
    /// marker).
    pub fn from_corners(corners: &[Point<TSpace>; 4]) -> Self {
        let mut x1 = f64::INFINITY;
        let mut y1 = f64::INFINITY;
        let mut x2 = f64::NEG_INFINITY;
        let mut y2 = f64::NEG_INFINITY;
        for corner in corners {
            x1 = x1.min(corner.x);
            y1 = y1.min(corner.y);
            x2 = x2.max(corner.x);
            y2 = y2.max(corner.y);
        }
        Self::from_xyxy(x1, y1, x2, y2)
    }

    /// Returns the left edge.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x1
    }

    /// Returns the top edge.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y1
    }

    /// Returns the width of the region.
    ///
    /// May be negative if the region is inverted (x2 < x1).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Returns the height of the region.
    ///
    /// May be negative if the region is inverted (y2 < y1).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Returns the area of the region.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Point<TSpace> {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Returns true if the region is properly ordered (x1 <= x2, y1 <= y2).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Translates every coordinate by `(dx, dy)`.
    #[inline]
    pub fn move_by(&self, dx: f64, dy: f64) -> Self {
        Self::from_xyxy(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Pushes every edge outward by `margin`. A negative margin shrinks.
    #[inline]
    pub fn grow(&self, margin: f64) -> Self {
        Self::from_xyxy(
            self.x1 - margin,
            self.y1 - margin,
            self.x2 + margin,
            self.y2 + margin,
        )
    }

    /// Returns the smallest square containing this region, centered on it.
    ///
    /// The shorter side is extended by the same amount on both ends.
    pub fn square(&self) -> Self {
        let side = self.width().max(self.height());
        let x1 = self.x1 - (side - self.width()) / 2.0;
        let y1 = self.y1 - (side - self.height()) / 2.0;
        Self::from_xyxy(x1, y1, x1 + side, y1 + side)
    }

    /// Returns the bounding region of `self` and `other`.
    #[inline]
    pub fn combine(&self, other: &Self) -> Self {
        Self::from_xyxy(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Returns the bounding region of every region in `regions`, or `None`
    /// when the iterator is empty.
    pub fn union_of<'a, I>(regions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
        TSpace: 'a,
    {
        let mut iter = regions.into_iter();
        let first = iter.next()?;
        let seed = Self::from_xyxy(first.x1, first.y1, first.x2, first.y2);
        Some(iter.fold(seed, |acc, region| acc.combine(region)))
    }

    /// Returns true if the interiors of the two regions overlap.
    ///
    /// Regions that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// Returns true if every coordinate of `self` lies within `other`.
    #[inline]
    pub fn is_inside(&self, other: &Self) -> bool {
        self.x1 >= other.x1 && self.y1 >= other.y1 && self.x2 <= other.x2 && self.y2 <= other.y2
    }

    /// Contracts `self` so that it no longer covers `other`.
    ///
    /// An edge of `self` that `other` straddles is pulled in to the edge of
    /// `other` lying inside `self`; a corner overlap pulls two edges. When
    /// `other` sits entirely inside `self` along an axis, only one
    /// contraction is applied: the one leaving the larger area. Disjoint
    /// regions, and regions `other` covers completely, come back unchanged.
    pub fn shrink_from(&self, other: &Self) -> Self {
        let unchanged = Self::from_xyxy(self.x1, self.y1, self.x2, self.y2);
        if !self.intersects(other) {
            return unchanged;
        }

        let x_axis = AxisOverlap::classify(self.x1, self.x2, other.x1, other.x2);
        let y_axis = AxisOverlap::classify(self.y1, self.y2, other.y1, other.y2);

        let (mut x1, mut y1, mut x2, mut y2) = (self.x1, self.y1, self.x2, self.y2);
        let mut straddled = false;
        match x_axis {
            AxisOverlap::StraddlesHigh => {
                x2 = other.x1;
                straddled = true;
            }
            AxisOverlap::StraddlesLow => {
                x1 = other.x2;
                straddled = true;
            }
            AxisOverlap::Encloses | AxisOverlap::Covers => {}
        }
        match y_axis {
            AxisOverlap::StraddlesHigh => {
                y2 = other.y1;
                straddled = true;
            }
            AxisOverlap::StraddlesLow => {
                y1 = other.y2;
                straddled = true;
            }
            AxisOverlap::Encloses | AxisOverlap::Covers => {}
        }
        if straddled {
            return Self::from_xyxy(x1, y1, x2, y2);
        }

        let mut candidates = Vec::with_capacity(4);
        if x_axis == AxisOverlap::Encloses {
            candidates.push(Self::from_xyxy(self.x1, self.y1, other.x1, self.y2));
            candidates.push(Self::from_xyxy(other.x2, self.y1, self.x2, self.y2));
        }
        if y_axis == AxisOverlap::Encloses {
            candidates.push(Self::from_xyxy(self.x1, self.y1, self.x2, other.y1));
            candidates.push(Self::from_xyxy(self.x1, other.y2, self.x2, self.y2));
        }

        candidates
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.area() > best.area() {
                    candidate
                } else {
                    best
                }
            })
            .unwrap_or(unchanged)
    }

    /// Converts to XYWH format (x, y, width, height).
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.width(), self.height())
    }
}

/// How an overlapping region sits relative to one axis of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisOverlap {
    /// Spans the whole axis.
    Covers,
    /// Crosses the low edge; only its high edge lies inside.
    StraddlesLow,
    /// Crosses the high edge; only its low edge lies inside.
    StraddlesHigh,
    /// Both edges lie inside.
    Encloses,
}

impl AxisOverlap {
    fn classify(lo: f64, hi: f64, other_lo: f64, other_hi: f64) -> Self {
        let low_inside = lo < other_lo && other_lo < hi;
        let high_inside = lo < other_hi && other_hi < hi;
        match (low_inside, high_inside) {
            (true, true) => AxisOverlap::Encloses,
            (true, false) => AxisOverlap::StraddlesHigh,
            (false, true) => AxisOverlap::StraddlesLow,
            (false, false) => AxisOverlap::Covers,
        }
    }
}

impl Region<Pixel> {
    /// Returns true if any edge reaches the border of a
    /// `frame_width` x `frame_height` photograph.
    ///
    /// A piece whose box touches the frame is probably cut off by it.
    #[inline]
    pub fn is_touching_frame(&self, frame_width: f64, frame_height: f64) -> bool {
        self.x1 <= 0.0 || self.y1 <= 0.0 || self.x2 >= frame_width || self.y2 >= frame_height
    }

    /// Clamps every coordinate into `[0, frame_width] x [0, frame_height]`.
    pub fn clamp_to_frame(&self, frame_width: f64, frame_height: f64) -> Self {
        Self::from_xyxy(
            self.x1.clamp(0.0, frame_width),
            self.y1.clamp(0.0, frame_height),
            self.x2.clamp(0.0, frame_width),
            self.y2.clamp(0.0, frame_height),
        )
    }

    /// Cuts this region out of `image` using the raster collaborator.
    ///
    /// Coordinates are truncated toward zero; no other geometry happens
    /// here.
    pub fn crop<R: Raster>(&self, raster: &R, image: &R::Image) -> Result<R::Image, R::Error> {
        raster.crop(
            image,
            self.x1 as i64,
            self.y1 as i64,
            self.x2 as i64,
            self.y2 as i64,
        )
    }

    /// Short deterministic digest of the coordinates.
    ///
    /// Only meant for naming output artifacts; two regions can share a
    /// fingerprint.
    pub fn stable_fingerprint(&self) -> String {
        let key = format!("{}.{}.{}.{}", self.x1, self.y1, self.x2, self.y2);
        let digest = format!("{:08x}", crc32c::crc32c(key.as_bytes()));
        digest[..6].to_owned()
    }

    /// Converts pixel coordinates to normalized coordinates.
    pub fn to_normalized(&self, frame_width: f64, frame_height: f64) -> Region<Normalized> {
        Region::from_xyxy(
            self.x1 / frame_width,
            self.y1 / frame_height,
            self.x2 / frame_width,
            self.y2 / frame_height,
        )
    }
}

impl Region<Normalized> {
    /// Converts normalized coordinates to pixel coordinates.
    pub fn to_pixel(&self, frame_width: f64, frame_height: f64) -> Region<Pixel> {
        Region::from_xyxy(
            self.x1 * frame_width,
            self.y1 * frame_height,
            self.x2 * frame_width,
            self.y2 * frame_height,
        )
    }
}

impl<TSpace> std::fmt::Debug for Region<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .field("x2", &self.x2)
            .field("y2", &self.y2)
            .finish()
    }
}

impl<TSpace> Default for Region<TSpace> {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}

// Regions travel as {x, y, w, h}, the shape the capture client draws with.
impl<TSpace> Serialize for Region<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Region", 4)?;
        state.serialize_field("x", &self.x1)?;
        state.serialize_field("y", &self.y1)?;
        state.serialize_field("w", &self.width())?;
        state.serialize_field("h", &self.height())?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Region<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RegionData {
            x: f64,
            y: f64,
            w: f64,
            h: f64,
        }
        let data = RegionData::deserialize(deserializer)?;
        Ok(Region::from_upper_left(data.x, data.y, data.w, data.h))
    }
}
