//! Reading and writing capture files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::{Capture, CaptureFile};
use crate::error::BrickmarkError;

/// Reads a capture file and resolves it against its own directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the frame
/// size cannot be determined.
pub fn read_capture_json(path: &Path) -> Result<Capture, BrickmarkError> {
    let file = File::open(path).map_err(BrickmarkError::Io)?;
    let reader = BufReader::new(file);

    let capture: CaptureFile =
        serde_json::from_reader(reader).map_err(|source| BrickmarkError::CaptureJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    capture.resolve(path.parent())
}

/// Writes a capture file as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_capture_json(path: &Path, capture: &CaptureFile) -> Result<(), BrickmarkError> {
    let file = File::create(path).map_err(BrickmarkError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, capture).map_err(|source| BrickmarkError::CaptureJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a capture file from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<CaptureFile, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a capture file from raw bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<CaptureFile, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes a capture file to a pretty-printed JSON string.
pub fn to_json_string(capture: &CaptureFile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(capture)
}
