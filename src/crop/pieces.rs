//! Per-piece views used by the classifier and the capture client.

use serde::Serialize;

use crate::geom::{Frame, Region};

/// A detected piece and whether it is usable.
///
/// Serializes flat as `{x, y, w, h, valid}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PieceReport {
    #[serde(flatten)]
    pub region: Region,
    /// False when the piece touches the frame and is probably cut off.
    pub valid: bool,
}

/// Flags every piece that touches the frame.
pub fn piece_reports(pieces: &[Region], frame: Frame) -> Vec<PieceReport> {
    pieces
        .iter()
        .map(|piece| PieceReport {
            region: *piece,
            valid: !frame.is_touched_by(piece),
        })
        .collect()
}

/// Picks the region handed to the part classifier: the largest piece that
/// does not touch the frame, squared.
///
/// Returns `None` when every piece touches the frame (or there are none).
pub fn classification_crop(pieces: &[Region], frame: Frame) -> Option<Region> {
    pieces
        .iter()
        .filter(|piece| !frame.is_touched_by(piece))
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .map(Region::square)
}
