//! Marker reconciliation report types.
//!
//! [`MarkerSet::valid`](super::MarkerSet::valid) answers yes or no; the
//! report says why, in a form that can be printed for a user or serialized
//! for the capture client.

use serde::Serialize;
use std::fmt;

use crate::color::ColorId;

/// The outcome of reconciling one photograph's markers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MarkerReport {
    /// Corner markers counted (after any merging the caller applied).
    pub corner_count: usize,

    /// Color markers counted.
    pub color_count: usize,

    /// Decoded color, present only when the set is valid.
    pub color_id: Option<ColorId>,

    /// All issues found.
    pub issues: Vec<MarkerIssue>,
}

impl MarkerReport {
    /// Creates a new report with no issues.
    pub fn new(corner_count: usize, color_count: usize) -> Self {
        Self {
            corner_count,
            color_count,
            color_id: None,
            issues: Vec::new(),
        }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: MarkerIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if any issue carries `code`.
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for MarkerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Markers: {} corner, {} color",
            self.corner_count, self.color_count
        )?;
        match self.color_id {
            Some(color_id) => writeln!(f, "Color id: {}", color_id)?,
            None => writeln!(f, "Color id: none")?,
        }

        if self.issues.is_empty() {
            return writeln!(f, "Marker set is valid");
        }

        writeln!(
            f,
            "Marker set has {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single marker issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct MarkerIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
}

impl MarkerIssue {
    /// Creates a new issue.
    pub fn new(severity: Severity, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }
}

impl fmt::Display for MarkerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(f, "[{}] {:?}: {}", severity, self.code, self.message)
    }
}

/// The severity of a marker issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth showing, but the set is still usable.
    Warning,
    /// The set cannot be trusted.
    Error,
}

/// A stable code identifying the type of marker issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    /// Not exactly two color symbols.
    ColorMarkerCount,
    /// Some but not all four corner markers.
    PartialCornerMarkers,
    /// An identifier outside the 100-entry dictionary.
    UnknownMarkerId,
    /// A dictionary identifier above 90 other than the corner sentinel.
    UnassignedMarkerId,
    /// Both color symbols fall in the same half of the dictionary, which the
    /// printed cards never do.
    ColorSymbolHalves,
}
