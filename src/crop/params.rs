//! Tunable crop parameters.

use serde::{Deserialize, Serialize};

/// Fractions that control how crops are grown and how markers are carved
/// out of them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    /// Margin added around the union of pieces, as a fraction of the
    /// longer frame side.
    pub piece_growth: f64,

    /// Margin added around each marker before it is carved out of a piece
    /// crop, as a fraction of that marker's own width.
    pub marker_margin: f64,

    /// Corner observations closer than this fraction of the frame width are
    /// taken to be the same physical corner.
    pub corner_merge: f64,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            piece_growth: 0.025,
            marker_margin: 0.10,
            corner_merge: 0.10,
        }
    }
}
