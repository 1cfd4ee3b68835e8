//! Configuration file support.
//!
//! A config file is YAML with two optional sections; anything left out
//! keeps its default.
//!
//! ```yaml
//! crop:
//!   piece_growth: 0.025
//!   marker_margin: 0.10
//!   corner_merge: 0.10
//! render:
//!   font_path: /usr/share/fonts/Arial.ttf
//!   font_size: 24
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crop::CropParams;
use crate::error::BrickmarkError;
use crate::render::RenderConfig;

/// All tunables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crop: CropParams,
    pub render: RenderConfig,
}

impl Config {
    /// Reads a config from a YAML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_yaml(path: &Path) -> Result<Self, BrickmarkError> {
        let file = File::open(path).map_err(BrickmarkError::Io)?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader).map_err(|source| BrickmarkError::ConfigYamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, BrickmarkError> {
        match path {
            Some(path) => Self::read_yaml(path),
            None => Ok(Self::default()),
        }
    }
}
