#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// An all-black 24-bit BMP; only the header matters to the size reader.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    const HEADER_LEN: u32 = 14 + 40;
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixels_len = row_stride * height;

    let file_header = [
        &b"BM"[..],
        &(HEADER_LEN + pixels_len).to_le_bytes(),
        &[0; 4],
        &HEADER_LEN.to_le_bytes(),
    ]
    .concat();
    let info_header = [
        &40u32.to_le_bytes()[..],
        &(width as i32).to_le_bytes(),
        &(height as i32).to_le_bytes(),
        &1u16.to_le_bytes(),
        &24u16.to_le_bytes(),
        &[0; 4],
        &pixels_len.to_le_bytes(),
        &[0; 16],
    ]
    .concat();

    let mut bytes = [file_header, info_header].concat();
    bytes.resize((HEADER_LEN + pixels_len) as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    fs::write(path, bmp_bytes(width, height)).expect("write bmp");
}

/// Writes a capture file into `dir` and returns its path.
pub fn write_capture(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).expect("write capture");
    path
}
