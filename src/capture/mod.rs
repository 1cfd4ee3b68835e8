//! Capture files: one photograph's detector output.
//!
//! A capture file is what the capture client uploads after running its
//! detectors: the image size, the piece boxes and the fiducial quads.
//!
//! ```json
//! {
//!   "image": {"width": 4032, "height": 3024, "path": "IMG_7936.jpg"},
//!   "space": "pixel",
//!   "pieces": [{"x": 1200, "y": 900, "w": 300, "h": 240, "label": "3001", "confidence": 0.91}],
//!   "markers": [{"id": 99, "corners": [[110, 52], [160, 50], [162, 101], [108, 99]]}]
//! }
//! ```
//!
//! [`CaptureFile`] is the wire schema. [`CaptureFile::resolve`] turns it into
//! a [`Capture`] in pixel coordinates with a known frame size.

mod io_json;

pub use io_json::{
    from_json_slice, from_json_str, read_capture_json, to_json_string, write_capture_json,
};

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::crop::{derive_crop, CropParams, CropPlan, CropStrategy};
use crate::error::BrickmarkError;
use crate::geom::{Frame, Normalized, Point, Region};
use crate::marker::{Marker, MarkerId, MarkerSet};

/// Coordinate space the detector reported in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    #[default]
    Pixel,
    /// Fractions of the frame in `[0, 1]`.
    Normalized,
}

/// The photograph a capture was made from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Image file, relative to the capture file. Used to read the size when
    /// `width` or `height` is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// A piece box as written in a capture file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceEntry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A fiducial quad as written in a capture file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    pub id: MarkerId,
    pub corners: [[f64; 2]; 4],
}

/// The capture file schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureFile {
    #[serde(default)]
    pub image: ImageInfo,
    #[serde(default)]
    pub space: CoordinateSpace,
    #[serde(default)]
    pub pieces: Vec<PieceEntry>,
    #[serde(default)]
    pub markers: Vec<MarkerEntry>,
}

/// A detected piece in pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceDetection {
    pub region: Region,
    pub label: Option<String>,
    pub confidence: Option<f64>,
}

/// One photograph's detections, in pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub frame: Frame,
    pub pieces: Vec<PieceDetection>,
    pub markers: MarkerSet,
}

impl CaptureFile {
    /// Resolves the frame size and converts every coordinate to pixels.
    ///
    /// `base_dir` is where a relative `image.path` is looked up.
    ///
    /// # Errors
    /// Fails when the frame size is missing and cannot be read from the
    /// image file.
    pub fn resolve(&self, base_dir: Option<&Path>) -> Result<Capture, BrickmarkError> {
        let frame = self.frame(base_dir)?;
        let (w, h) = (frame.width, frame.height);

        let pieces = self
            .pieces
            .iter()
            .map(|piece| {
                let region = match self.space {
                    CoordinateSpace::Pixel => {
                        Region::from_upper_left(piece.x, piece.y, piece.w, piece.h)
                    }
                    CoordinateSpace::Normalized => {
                        Region::<Normalized>::from_upper_left(piece.x, piece.y, piece.w, piece.h)
                            .to_pixel(w, h)
                    }
                };
                PieceDetection {
                    region,
                    label: piece.label.clone(),
                    confidence: piece.confidence,
                }
            })
            .collect();

        let markers = self
            .markers
            .iter()
            .map(|marker| {
                let region = match self.space {
                    CoordinateSpace::Pixel => {
                        Region::from_corners(&marker.corners.map(|[x, y]| Point::new(x, y)))
                    }
                    CoordinateSpace::Normalized => Region::<Normalized>::from_corners(
                        &marker.corners.map(|[x, y]| Point::new(x, y)),
                    )
                    .to_pixel(w, h),
                };
                Marker::new(marker.id, region)
            })
            .collect();

        Ok(Capture {
            frame,
            pieces,
            markers,
        })
    }

    fn frame(&self, base_dir: Option<&Path>) -> Result<Frame, BrickmarkError> {
        if let (Some(width), Some(height)) = (self.image.width, self.image.height) {
            return Ok(Frame::new(width, height));
        }
        let Some(path) = &self.image.path else {
            return Err(BrickmarkError::MissingImageSize);
        };
        let path = match base_dir {
            Some(dir) => dir.join(path),
            None => path.clone(),
        };
        let size = imagesize::size(&path).map_err(|source| BrickmarkError::ImageDimensionRead {
            path: path.clone(),
            source,
        })?;
        debug!(
            "read frame size {}x{} from {}",
            size.width,
            size.height,
            path.display()
        );
        Ok(Frame::new(size.width as f64, size.height as f64))
    }
}

impl Capture {
    /// Returns the piece regions.
    pub fn piece_regions(&self) -> Vec<Region> {
        self.pieces.iter().map(|p| p.region).collect()
    }

    /// Derives this capture's crop.
    pub fn derive_crop(
        &self,
        params: &CropParams,
        strategy: CropStrategy,
    ) -> Result<CropPlan, BrickmarkError> {
        derive_crop(
            &self.piece_regions(),
            &self.markers,
            self.frame,
            params,
            strategy,
        )
    }
}
