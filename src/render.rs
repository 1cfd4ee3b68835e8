//! Label geometry for annotated output images.
//!
//! Drawing and text measurement belong to the rendering backend. This
//! module only decides where things go: a label hangs below a region's
//! bottom-left corner, with a color swatch followed by the caption.
//!
//! ```text
//!  region
//! +-------------------+
//! |                   |
//! +-------------------+---------+
//! | [##]  87%: Blue (1)         |
//! +-----------------------------+
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geom::{Point, Region};

/// Fonts and spacing for labels. Built once and passed by reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// TrueType font for captions; the backend's default font when unset.
    pub font_path: Option<PathBuf>,
    pub font_size: f64,
    /// Inset of the swatch and caption from the label's top-left corner.
    pub padding: f64,
    pub swatch_size: f64,
    /// Space between the swatch and the caption.
    pub text_gap: f64,
    pub label_height: f64,
    /// Space after the caption before the label ends.
    pub trailing_space: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 24.0,
            padding: 5.0,
            swatch_size: 25.0,
            text_gap: 10.0,
            label_height: 35.0,
            trailing_space: 25.0,
        }
    }
}

/// Where the parts of one label are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LabelLayout {
    pub background: Region,
    pub swatch: Region,
    /// Top-left corner of the caption text.
    pub text_origin: Point,
}

/// Lays out a label under `region` for a caption `text_width` pixels wide.
pub fn label_layout(region: &Region, text_width: f64, config: &RenderConfig) -> LabelLayout {
    let (x, y) = (region.x1, region.y2);
    let background = Region::from_xyxy(
        x,
        y,
        x + config.swatch_size + text_width + config.trailing_space,
        y + config.label_height,
    );
    let swatch = Region::from_upper_left(
        x + config.padding,
        y + config.padding,
        config.swatch_size,
        config.swatch_size,
    );
    let text_origin = Point::new(
        x + config.padding + config.swatch_size + config.text_gap,
        y + config.padding,
    );
    LabelLayout {
        background,
        swatch,
        text_origin,
    }
}
