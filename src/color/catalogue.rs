//! Color catalogue lookup.
//!
//! The catalogue itself is external data; this module defines the lookup
//! seam and a CSV-backed implementation that reads the Rebrickable
//! `colors.csv` export.
//!
//! # CSV Format Reference
//!
//! Required columns, by header name:
//! - `id`: canonical color id
//! - `name`: display name
//! - `rgb`: six hex digits without a leading `#`
//!
//! An optional `is_trans` column (`t`/`f` or `True`/`False`) marks
//! transparent colors. Any other columns are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ColorId;
use crate::error::BrickmarkError;

/// A catalogue entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    /// Six hex digits, no leading `#`.
    pub rgb: String,
    pub is_transparent: bool,
}

impl Color {
    /// Creates an opaque color.
    pub fn new(id: impl Into<ColorId>, name: impl Into<String>, rgb: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rgb: rgb.into(),
            is_transparent: false,
        }
    }

    /// Returns the color as a CSS-style `#RRGGBB` string.
    pub fn hex(&self) -> String {
        format!("#{}", self.rgb.to_ascii_uppercase())
    }

}

/// Lookup from canonical color id to catalogue entry.
pub trait ColorCatalogue {
    /// Returns the entry for `id`, or `None` if the catalogue lacks it.
    fn color(&self, id: ColorId) -> Option<&Color>;
}

/// In-memory catalogue loaded from a colors CSV.
#[derive(Clone, Debug, Default)]
pub struct CsvColorCatalogue {
    colors: BTreeMap<ColorId, Color>,
}

#[derive(Debug, Deserialize)]
struct ColorRow {
    id: u32,
    name: String,
    rgb: String,
    #[serde(default)]
    is_trans: Option<String>,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
        let is_transparent = matches!(
            row.is_trans.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("t" | "true" | "1")
        );
        Self {
            id: ColorId(row.id),
            name: row.name,
            rgb: row.rgb,
            is_transparent,
        }
    }
}

impl CsvColorCatalogue {
    /// Builds a catalogue from entries. Later duplicates replace earlier
    /// ones.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Reads a catalogue from a colors CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or a row fails to parse.
    pub fn read_csv(path: &Path) -> Result<Self, BrickmarkError> {
        let file = File::open(path).map_err(BrickmarkError::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader).map_err(|source| BrickmarkError::CatalogueCsvParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a catalogue from CSV text.
    ///
    /// Useful for testing without file I/O.
    pub fn from_csv_str(csv: &str) -> Result<Self, csv::Error> {
        Self::from_reader(csv.as_bytes())
    }

    fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut colors = Vec::new();
        for result in csv_reader.deserialize() {
            let row: ColorRow = result?;
            colors.push(Color::from(row));
        }
        Ok(Self::from_colors(colors))
    }

    /// Returns the number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the catalogue has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl ColorCatalogue for CsvColorCatalogue {
    fn color(&self, id: ColorId) -> Option<&Color> {
        self.colors.get(&id)
    }
}

/// The JSON projection of an identified color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorReport {
    pub id: ColorId,
    pub name: String,
    pub hex: String,
    pub transparent: bool,
    pub confidence: f64,
}

impl ColorReport {
    /// Projects a catalogue entry with the confidence it was identified
    /// with. Colors decoded from markers are certain and use `1.0`.
    pub fn new(color: &Color, confidence: f64) -> Self {
        Self {
            id: color.id,
            name: color.name.clone(),
            hex: color.hex(),
            transparent: color.is_transparent,
            confidence,
        }
    }
}
