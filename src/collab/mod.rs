//! Seams to the services this crate does not implement.
//!
//! Detection models, raster decoding and the part database live outside
//! the crate. Each is reached through a small trait so the reconciliation
//! layer can be driven by real services in production and by plain structs
//! in tests.

mod predictor;

pub use predictor::{PartReport, PieceColorCheck, Predictor, MIN_PART_CONFIDENCE};

use std::collections::BTreeMap;

use crate::error::BrickmarkError;

/// Raster image operations.
pub trait Raster {
    /// The image handle the raster backend works with.
    type Image;
    /// Backend failure type.
    type Error;

    /// Cuts the `[x1, x2) x [y1, y2)` window out of `image`.
    fn crop(&self, image: &Self::Image, x1: i64, y1: i64, x2: i64, y2: i64)
        -> Result<Self::Image, Self::Error>;
}

/// One ranked classifier output.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    pub label: String,
    pub confidence: f64,
}

impl Ranked {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// An image classifier returning labels ranked by confidence, best first.
pub trait Classifier<I> {
    /// Classifies `image`, returning at most `top_k` labels.
    fn classify(&self, image: &I, top_k: usize) -> Result<Vec<Ranked>, BrickmarkError>;
}

/// Lookup from part number to display name.
pub trait PartCatalogue {
    /// Returns the display name of `part_num`, if known.
    fn part_name(&self, part_num: &str) -> Option<String>;

    /// Maps a classifier label to the catalogue's part number.
    ///
    /// Classifiers trained on a mix of part numbering schemes emit labels
    /// the catalogue does not use; implementations can remap them here.
    fn canonical_part_num(&self, label: &str) -> String {
        label.to_owned()
    }
}

/// An in-memory part catalogue keyed by part number.
impl PartCatalogue for BTreeMap<String, String> {
    fn part_name(&self, part_num: &str) -> Option<String> {
        self.get(part_num).cloned()
    }
}
