use std::path::PathBuf;
use thiserror::Error;

use crate::color::ColorId;
use crate::marker::MarkerReport;

/// The main error type for brickmark operations.
#[derive(Debug, Error)]
pub enum BrickmarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse capture JSON from {path}: {source}")]
    CaptureJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write capture JSON to {path}: {source}")]
    CaptureJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config YAML from {path}: {source}")]
    ConfigYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse color catalogue CSV from {path}: {source}")]
    CatalogueCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Capture has no image size and no image path to read it from")]
    MissingImageSize,

    #[error("Cannot derive a crop from pieces: no pieces were detected")]
    NoPieces,

    #[error("Cannot derive a crop from markers: found {found} corner marker(s), expected 4")]
    CornerMarkerCount { found: usize },

    #[error("Marker set rejected with {error_count} error(s) and {warning_count} warning(s)")]
    MarkersRejected {
        error_count: usize,
        warning_count: usize,
        report: MarkerReport,
    },

    #[error("Color {0} is not in the color catalogue")]
    UnknownColor(ColorId),

    #[error("{service} returned an unusable result: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },

    #[error("{failed} of {total} capture(s) failed")]
    BatchFailed { failed: usize, total: usize },
}
