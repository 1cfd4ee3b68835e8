//! Fuzz target for capture JSON parsing and crop derivation.
//!
//! This fuzzer feeds arbitrary byte sequences to the capture parser and,
//! when they parse, runs every crop strategy over the result, checking for
//! panics, crashes, or hangs.

#![no_main]

use brickmark::capture::from_json_slice;
use brickmark::crop::{CropParams, CropStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(file) = from_json_slice(data) else {
        return;
    };
    // Only captures that carry their own size; no file system access.
    if file.image.width.is_none() || file.image.height.is_none() {
        return;
    }
    let Ok(capture) = file.resolve(None) else {
        return;
    };

    let params = CropParams::default();
    for strategy in [CropStrategy::Auto, CropStrategy::Pieces, CropStrategy::Markers] {
        let _ = capture.derive_crop(&params, strategy);
    }
    let _ = capture.markers.report();
});
