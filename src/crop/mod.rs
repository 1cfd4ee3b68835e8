//! Crop derivation.
//!
//! Turns one photograph's piece detections, marker detections and frame
//! size into the single region the working image is cropped to. There are
//! two strategies:
//!
//! - **piece-driven**: the union of all pieces, grown by a margin, with
//!   every marker carved back out of it;
//! - **marker-driven**: the tightest box between the four corner blocks of
//!   the capture rig, for whole-frame captures taken before any piece
//!   detector ran.
//!
//! Failures are returned as errors. Nothing here falls back to the full
//! frame on its own.

mod params;
mod pieces;

pub use params::CropParams;
pub use pieces::{classification_crop, piece_reports, PieceReport};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BrickmarkError;
use crate::geom::{Frame, Region};
use crate::marker::{MarkerSet, CORNER_MARKER_COUNT};

/// Which crop strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CropStrategy {
    /// Piece-driven when any pieces were detected, marker-driven otherwise.
    #[default]
    Auto,
    /// Always piece-driven.
    Pieces,
    /// Always marker-driven.
    Markers,
}

impl fmt::Display for CropStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CropStrategy::Auto => "auto",
            CropStrategy::Pieces => "pieces",
            CropStrategy::Markers => "markers",
        };
        f.write_str(name)
    }
}

/// A derived crop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CropPlan {
    /// The strategy that produced the region; never `Auto`.
    pub strategy: CropStrategy,
    pub region: Region,
    /// Short digest of `region`, for naming output files.
    pub fingerprint: String,
}

impl CropPlan {
    fn new(strategy: CropStrategy, region: Region) -> Self {
        Self {
            strategy,
            region,
            fingerprint: region.stable_fingerprint(),
        }
    }

    /// Maps a region detected on the cropped sub-image back to frame
    /// coordinates.
    ///
    /// The raster backend truncates crop coordinates, so the sub-image
    /// origin is the truncated upper-left corner.
    pub fn to_frame(&self, sub_region: &Region) -> Region {
        sub_region.move_by(self.region.x1.trunc(), self.region.y1.trunc())
    }

    /// Returns true if `piece` lies entirely inside the crop.
    pub fn contains(&self, piece: &Region) -> bool {
        piece.is_inside(&self.region)
    }
}

/// Piece-driven crop.
///
/// The union of `pieces` is grown by `piece_growth` times the longer frame
/// side, then every marker (corner and color alike), grown by
/// `marker_margin` times its own width, is carved out with
/// [`Region::shrink_from`].
///
/// # Errors
/// [`BrickmarkError::NoPieces`] when `pieces` is empty.
pub fn piece_crop(
    pieces: &[Region],
    markers: &MarkerSet,
    frame: Frame,
    params: &CropParams,
) -> Result<Region, BrickmarkError> {
    let union = Region::union_of(pieces).ok_or(BrickmarkError::NoPieces)?;
    let mut region = union.grow(frame.longest_side() * params.piece_growth);
    debug!(
        "union of {} piece(s) grown to {:?}",
        pieces.len(),
        region
    );

    for marker in markers.markers() {
        let keep_out = marker.region.grow(marker.region.width() * params.marker_margin);
        let shrunk = region.shrink_from(&keep_out);
        if shrunk != region {
            debug!("marker {} carved crop to {:?}", marker.id, shrunk);
        }
        region = shrunk;
    }
    Ok(region)
}

/// Marker-driven crop.
///
/// Corner observations are merged first (see
/// [`MarkerSet::combine_nearby_corner_markers`]); exactly four corners must
/// remain. Each edge of the crop is then the inner edge of the markers on
/// that side of the frame center: the left edge is the largest `x2` among
/// markers centered left of center, the right edge the smallest `x1` among
/// markers centered right of it, and likewise vertically. A side with no
/// markers falls back to the frame border.
///
/// # Errors
/// [`BrickmarkError::CornerMarkerCount`] when the merged set does not have
/// exactly four corner markers.
pub fn marker_crop(
    markers: &MarkerSet,
    frame: Frame,
    params: &CropParams,
) -> Result<Region, BrickmarkError> {
    let merged = markers.combine_nearby_corner_markers(frame.width * params.corner_merge);
    let found = merged.corner_markers().len();
    if found != CORNER_MARKER_COUNT {
        return Err(BrickmarkError::CornerMarkerCount { found });
    }

    let center = frame.center();
    let mut left = 0.0_f64;
    let mut top = 0.0_f64;
    let mut right = frame.width;
    let mut bottom = frame.height;

    for region in merged.regions() {
        let c = region.center();
        if c.x < center.x {
            left = left.max(region.x2);
        } else if c.x > center.x {
            right = right.min(region.x1);
        }
        if c.y < center.y {
            top = top.max(region.y2);
        } else if c.y > center.y {
            bottom = bottom.min(region.y1);
        }
    }

    let region = Region::from_xyxy(left, top, right, bottom);
    if !region.is_ordered() {
        warn!("corner markers overlap the frame center; crop {:?} is inverted", region);
    }
    Ok(region)
}

/// Runs the requested crop strategy and packages the result.
pub fn derive_crop(
    pieces: &[Region],
    markers: &MarkerSet,
    frame: Frame,
    params: &CropParams,
    strategy: CropStrategy,
) -> Result<CropPlan, BrickmarkError> {
    let strategy = match strategy {
        CropStrategy::Auto if pieces.is_empty() => CropStrategy::Markers,
        CropStrategy::Auto => CropStrategy::Pieces,
        other => other,
    };
    debug!(
        "deriving {:?} crop from {} piece(s) and {} marker(s)",
        strategy,
        pieces.len(),
        markers.len()
    );

    let region = match strategy {
        CropStrategy::Markers => marker_crop(markers, frame, params)?,
        _ => piece_crop(pieces, markers, frame, params)?,
    };
    Ok(CropPlan::new(strategy, region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn no_growth() -> CropParams {
        CropParams {
            piece_growth: 0.0,
            ..CropParams::default()
        }
    }

    fn block(id: u8, x: f64, y: f64, size: f64) -> Marker {
        Marker::new(id, Region::from_upper_left(x, y, size, size))
    }

    /// Four corner blocks 50px square in a 1000x800 frame, plus the color
    /// card just below the bottom-left block.
    fn rig() -> MarkerSet {
        MarkerSet::new(vec![
            block(99, 50.0, 50.0, 50.0),
            block(99, 900.0, 50.0, 50.0),
            block(99, 50.0, 700.0, 50.0),
            block(99, 900.0, 700.0, 50.0),
            block(26, 50.0, 760.0, 20.0),
            block(54, 80.0, 760.0, 20.0),
        ])
    }

    #[test]
    fn test_piece_crop_is_union_without_growth() {
        let pieces = [
            Region::from_xyxy(0.0, 0.0, 10.0, 10.0),
            Region::from_xyxy(20.0, 20.0, 30.0, 30.0),
        ];
        let region = piece_crop(&pieces, &MarkerSet::default(), Frame::new(100u32, 100u32), &no_growth())
            .expect("crop");
        assert_eq!(region, Region::from_xyxy(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn test_piece_crop_grows_by_longest_side() {
        let pieces = [Region::from_xyxy(100.0, 100.0, 200.0, 200.0)];
        let params = CropParams {
            piece_growth: 0.025,
            ..CropParams::default()
        };
        let region =
            piece_crop(&pieces, &MarkerSet::default(), Frame::new(400u32, 200u32), &params).expect("crop");
        assert_eq!(region, Region::from_xyxy(90.0, 90.0, 210.0, 210.0));
    }

    #[test]
    fn test_piece_crop_carves_out_markers() {
        let pieces = [
            Region::from_xyxy(100.0, 100.0, 200.0, 200.0),
            Region::from_xyxy(300.0, 100.0, 400.0, 200.0),
        ];
        // A color card straddling the right edge of the union.
        let markers = MarkerSet::new(vec![block(26, 390.0, 120.0, 20.0)]);
        let region =
            piece_crop(&pieces, &markers, Frame::new(1000u32, 1000u32), &no_growth()).expect("crop");
        // Marker grown by 10% of its width: x1 = 388.
        assert_eq!(region, Region::from_xyxy(100.0, 100.0, 388.0, 200.0));
    }

    #[test]
    fn test_piece_crop_without_pieces() {
        let result = piece_crop(&[], &rig(), Frame::new(1000u32, 800u32), &CropParams::default());
        assert!(matches!(result, Err(BrickmarkError::NoPieces)));
    }

    #[test]
    fn test_marker_crop_excludes_markers() {
        let region = marker_crop(&rig(), Frame::new(1000u32, 800u32), &CropParams::default())
            .expect("crop");
        assert_eq!(region, Region::from_xyxy(100.0, 100.0, 900.0, 700.0));
    }

    #[test]
    fn test_marker_crop_merges_duplicate_corners() {
        let mut markers = rig().markers().to_vec();
        // The top-left block seen on a second face.
        markers.push(block(99, 60.0, 40.0, 50.0));
        let region = marker_crop(
            &MarkerSet::new(markers),
            Frame::new(1000u32, 800u32),
            &CropParams::default(),
        )
        .expect("crop");
        assert_eq!(region, Region::from_xyxy(110.0, 100.0, 900.0, 700.0));
    }

    #[test]
    fn test_marker_crop_skips_axis_for_centered_marker() {
        // Top corner block centered on x = 500; counted on either side it
        // would pull the crop to 525 or 475.
        let markers = MarkerSet::new(vec![
            block(99, 475.0, 50.0, 50.0),
            block(99, 900.0, 50.0, 50.0),
            block(99, 50.0, 700.0, 50.0),
            block(99, 900.0, 700.0, 50.0),
        ]);
        let region = marker_crop(&markers, Frame::new(1000u32, 800u32), &CropParams::default())
            .expect("crop");
        assert_eq!(region, Region::from_xyxy(100.0, 100.0, 900.0, 700.0));
    }

    #[test]
    fn test_marker_crop_requires_four_corners() {
        let markers: MarkerSet = rig()
            .markers()
            .iter()
            .copied()
            .filter(|m| m.region.x1 != 900.0 || m.region.y1 != 700.0)
            .collect();
        let result = marker_crop(&markers, Frame::new(1000u32, 800u32), &CropParams::default());
        assert!(matches!(
            result,
            Err(BrickmarkError::CornerMarkerCount { found: 3 })
        ));
    }

    #[test]
    fn test_derive_crop_auto_selects_by_signals() {
        let frame = Frame::new(1000u32, 800u32);
        let params = CropParams::default();

        let plan = derive_crop(&[], &rig(), frame, &params, CropStrategy::Auto).expect("crop");
        assert_eq!(plan.strategy, CropStrategy::Markers);
        assert_eq!(plan.fingerprint, plan.region.stable_fingerprint());

        let pieces = [Region::from_xyxy(300.0, 300.0, 400.0, 400.0)];
        let plan = derive_crop(&pieces, &rig(), frame, &params, CropStrategy::Auto).expect("crop");
        assert_eq!(plan.strategy, CropStrategy::Pieces);
    }

    #[test]
    fn test_derive_crop_forced_strategy_errors() {
        let frame = Frame::new(1000u32, 800u32);
        let params = CropParams::default();
        assert!(matches!(
            derive_crop(&[], &rig(), frame, &params, CropStrategy::Pieces),
            Err(BrickmarkError::NoPieces)
        ));
        let pieces = [Region::from_xyxy(300.0, 300.0, 400.0, 400.0)];
        assert!(matches!(
            derive_crop(&pieces, &MarkerSet::default(), frame, &params, CropStrategy::Markers),
            Err(BrickmarkError::CornerMarkerCount { found: 0 })
        ));
    }

    #[test]
    fn test_crop_plan_to_frame_and_contains() {
        let plan = CropPlan::new(
            CropStrategy::Pieces,
            Region::from_xyxy(100.7, 50.2, 500.0, 400.0),
        );
        let sub = Region::from_xyxy(10.0, 10.0, 20.0, 20.0);
        assert_eq!(plan.to_frame(&sub), Region::from_xyxy(110.0, 60.0, 120.0, 70.0));
        assert!(plan.contains(&Region::from_xyxy(200.0, 100.0, 300.0, 200.0)));
        assert!(!plan.contains(&Region::from_xyxy(50.0, 100.0, 300.0, 200.0)));
    }

    #[test]
    fn test_crop_plan_json() {
        let plan = CropPlan::new(CropStrategy::Markers, Region::from_xyxy(0.0, 0.0, 10.0, 10.0));
        let json = serde_json::to_value(&plan).expect("serialize");
        assert_eq!(json["strategy"], "markers");
        assert_eq!(json["region"]["w"], 10.0);
        assert_eq!(json["fingerprint"].as_str().map(str::len), Some(6));
    }
}
