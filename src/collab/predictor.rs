//! Part and color prediction over external classifiers.

use log::{debug, warn};
use serde::Serialize;
use std::fmt;

use super::{Classifier, PartCatalogue, Raster, Ranked};
use crate::color::{ColorCatalogue, ColorId, ColorReport};
use crate::error::BrickmarkError;
use crate::geom::Region;

/// Part predictions below this confidence are dropped.
pub const MIN_PART_CONFIDENCE: f64 = 0.10;

/// Number of part candidates requested from the part classifier.
const PART_TOP_K: usize = 3;

/// Shown when the classifier emits a part number the catalogue lacks.
const UNKNOWN_PART_NAME: &str = "??? mismatched ids";

/// One part candidate for a cropped piece, with the piece's color.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartReport {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    pub color: ColorReport,
}

/// Predicted color of one piece compared with the color the markers encode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceColorCheck {
    pub region: Region,
    pub predicted: ColorReport,
    pub correct: bool,
}

impl PieceColorCheck {
    /// Caption drawn under the piece, e.g. `"87%: Bright Light Yellow (226)"`.
    pub fn label_text(&self) -> String {
        format!(
            "{:.0}%: {} ({})",
            self.predicted.confidence * 100.0,
            self.predicted.name,
            self.predicted.id
        )
    }
}

/// Composes a part classifier, a color classifier and the two catalogues.
///
/// Everything is borrowed: the predictor holds no state of its own and is
/// built per request.
pub struct Predictor<'a, PC, CC, P, C> {
    part_classifier: &'a PC,
    color_classifier: &'a CC,
    parts: &'a P,
    colors: &'a C,
}

impl<'a, PC, CC, P, C> Predictor<'a, PC, CC, P, C>
where
    P: PartCatalogue,
    C: ColorCatalogue,
{
    pub fn new(
        part_classifier: &'a PC,
        color_classifier: &'a CC,
        parts: &'a P,
        colors: &'a C,
    ) -> Self {
        Self {
            part_classifier,
            color_classifier,
            parts,
            colors,
        }
    }

    /// Predicts the color of a single piece image.
    ///
    /// # Errors
    /// Fails if the color classifier returns nothing, returns a label that
    /// is not a color id, or names a color missing from the catalogue.
    pub fn predict_color<I>(&self, image: &I) -> Result<ColorReport, BrickmarkError>
    where
        CC: Classifier<I>,
    {
        let ranked = self.color_classifier.classify(image, 1)?;
        let Some(best) = ranked.into_iter().next() else {
            return Err(BrickmarkError::Collaborator {
                service: "color classifier",
                message: "no labels returned".to_owned(),
            });
        };
        let id = parse_color_label(&best)?;
        let color = self
            .colors
            .color(id)
            .ok_or(BrickmarkError::UnknownColor(id))?;
        Ok(ColorReport::new(color, best.confidence))
    }

    /// Predicts up to three part candidates for a piece image, each paired
    /// with the piece's predicted color.
    pub fn predict<I>(&self, image: &I) -> Result<Vec<PartReport>, BrickmarkError>
    where
        PC: Classifier<I>,
        CC: Classifier<I>,
    {
        let ranked = self.part_classifier.classify(image, PART_TOP_K)?;
        let color = self.predict_color(image)?;

        let reports: Vec<PartReport> = ranked
            .into_iter()
            .take(PART_TOP_K)
            .filter(|r| r.confidence >= MIN_PART_CONFIDENCE)
            .map(|r| {
                let id = self.parts.canonical_part_num(&r.label);
                let name = self
                    .parts
                    .part_name(&id)
                    .unwrap_or_else(|| UNKNOWN_PART_NAME.to_owned());
                PartReport {
                    id,
                    name,
                    confidence: r.confidence,
                    color: color.clone(),
                }
            })
            .collect();
        debug!("predicted {} part candidate(s)", reports.len());
        Ok(reports)
    }

    /// Predicts the color of every piece inside `crop` and compares it with
    /// `expected`, the color decoded from the markers.
    ///
    /// Pieces not fully inside `crop` are skipped.
    pub fn check_piece_colors<R>(
        &self,
        raster: &R,
        image: &R::Image,
        pieces: &[Region],
        crop: &Region,
        expected: ColorId,
    ) -> Result<Vec<PieceColorCheck>, BrickmarkError>
    where
        R: Raster,
        R::Error: fmt::Display,
        CC: Classifier<R::Image>,
    {
        let mut checks = Vec::new();
        for piece in pieces {
            if !piece.is_inside(crop) {
                continue;
            }
            let piece_image =
                piece
                    .crop(raster, image)
                    .map_err(|e| BrickmarkError::Collaborator {
                        service: "raster",
                        message: e.to_string(),
                    })?;
            let predicted = self.predict_color(&piece_image)?;
            let correct = predicted.id == expected;
            if !correct {
                warn!(
                    "piece at {:?} predicted as color {}, markers say {}",
                    piece, predicted.id, expected
                );
            }
            checks.push(PieceColorCheck {
                region: *piece,
                predicted,
                correct,
            });
        }
        Ok(checks)
    }
}

fn parse_color_label(ranked: &Ranked) -> Result<ColorId, BrickmarkError> {
    ranked
        .label
        .trim()
        .parse::<u32>()
        .map(ColorId)
        .map_err(|_| BrickmarkError::Collaborator {
            service: "color classifier",
            message: format!("label {:?} is not a color id", ranked.label),
        })
}
