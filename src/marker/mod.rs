//! Fiducial marker observations.
//!
//! A [`Marker`] is one detected fiducial: its dictionary identifier plus the
//! bounding region of the quad the detector found. Whether a marker is a
//! corner sentinel, half of a color pair, or neither is derived from the
//! identifier and never stored.

mod report;
mod set;

pub use report::{IssueCode, MarkerIssue, MarkerReport, Severity};
pub use set::{MarkerSet, COLOR_MARKER_COUNT, CORNER_MARKER_COUNT};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geom::{Point, Region};

/// Identifier of a fiducial in the 100-entry marker dictionary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u8);

impl MarkerId {
    /// The reserved identifier printed on every face of a corner block.
    pub const CORNER: MarkerId = MarkerId(99);

    /// Number of identifiers in the marker dictionary.
    pub const DICTIONARY_SIZE: u8 = 100;

    /// Highest identifier printed on a color card.
    pub const MAX_COLOR_SYMBOL: u8 = 90;

    /// Creates a new MarkerId.
    #[inline]
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the underlying u8 value.
    #[inline]
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Returns true if the identifier exists in the marker dictionary.
    #[inline]
    pub fn is_in_dictionary(&self) -> bool {
        self.0 < Self::DICTIONARY_SIZE
    }

    /// Returns the role this identifier plays on the capture rig.
    #[inline]
    pub fn role(&self) -> MarkerRole {
        if *self == Self::CORNER {
            MarkerRole::Corner
        } else if self.0 <= Self::MAX_COLOR_SYMBOL {
            MarkerRole::Color
        } else {
            MarkerRole::Other
        }
    }
}

impl fmt::Debug for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkerId({})", self.0)
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for MarkerId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// What a marker means on the capture rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    /// Marks a corner of the capture box; repeated on every visible face.
    Corner,
    /// One of the two symbols that jointly encode a color.
    Color,
    /// Not printed on the rig: ids 91 to 98 and anything outside the
    /// dictionary. Ignored by reconciliation.
    Other,
}

/// A single fiducial observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub region: Region,
}

impl Marker {
    /// Creates a marker from an identifier and an already computed region.
    pub fn new(id: impl Into<MarkerId>, region: Region) -> Self {
        Self {
            id: id.into(),
            region,
        }
    }

    /// Creates a marker from a detector result: the identifier and the four
    /// corners of the detected quad, in detector order.
    pub fn from_detection(id: impl Into<MarkerId>, quad: &[Point; 4]) -> Self {
        Self::new(id, Region::from_corners(quad))
    }

    /// Returns the role derived from the identifier.
    #[inline]
    pub fn role(&self) -> MarkerRole {
        self.id.role()
    }

    /// Returns true for corner sentinel markers.
    #[inline]
    pub fn is_corner(&self) -> bool {
        self.role() == MarkerRole::Corner
    }

    /// Returns true for color symbol markers.
    #[inline]
    pub fn is_color(&self) -> bool {
        self.role() == MarkerRole::Color
    }

    /// Returns true for markers the rig never prints.
    #[inline]
    pub fn is_other(&self) -> bool {
        self.role() == MarkerRole::Other
    }
}
