//! Per-photograph marker reconciliation.

use log::debug;
use serde::{Deserialize, Serialize};

use super::report::{IssueCode, MarkerIssue, MarkerReport};
use super::{Marker, MarkerId};
use crate::color::ColorId;
use crate::geom::{combine_nearby, Point, Region};

/// Number of corner markers a complete capture rig shows.
pub const CORNER_MARKER_COUNT: usize = 4;

/// Number of symbols that jointly encode one color.
pub const COLOR_MARKER_COUNT: usize = 2;

/// All markers detected in one photograph.
///
/// The set is unordered: detectors report markers in whatever order they
/// find them, and nothing here depends on that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    /// Creates a set from already built markers.
    pub fn new(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    /// Builds a set from raw detector output: identifiers and quads are
    /// paired up positionally.
    ///
    /// No identifiers means nothing was detected and yields an empty set.
    /// If the two slices disagree in length, the surplus is ignored.
    pub fn from_detection(ids: &[MarkerId], quads: &[[Point; 4]]) -> Self {
        if ids.len() != quads.len() {
            debug!(
                "marker detection returned {} ids but {} quads; pairing the first {}",
                ids.len(),
                quads.len(),
                ids.len().min(quads.len())
            );
        }
        let markers = ids
            .iter()
            .zip(quads)
            .map(|(id, quad)| Marker::from_detection(*id, quad))
            .collect();
        Self { markers }
    }

    /// Returns every marker in the set.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Returns the corner sentinel markers.
    pub fn corner_markers(&self) -> Vec<&Marker> {
        self.markers.iter().filter(|m| m.is_corner()).collect()
    }

    /// Returns the color symbol markers.
    pub fn color_markers(&self) -> Vec<&Marker> {
        self.markers.iter().filter(|m| m.is_color()).collect()
    }

    /// Returns true if the set describes a usable capture: exactly two
    /// color symbols, and either no corner markers or all four.
    ///
    /// A partial corner count means part of the box is out of frame or a
    /// face was missed, so the set is not trusted.
    pub fn valid(&self) -> bool {
        let corners = self.corner_markers().len();
        let colors = self.color_markers().len();
        colors == COLOR_MARKER_COUNT && (corners == 0 || corners == CORNER_MARKER_COUNT)
    }

    /// Returns the color encoded by the two color symbols, if the set is
    /// valid.
    pub fn color_id(&self) -> Option<ColorId> {
        if !self.valid() {
            return None;
        }
        match self.color_markers().as_slice() {
            [a, b] => Some(ColorId::from_symbols(a.id, b.id)),
            _ => None,
        }
    }

    /// Returns markers that are neither corner sentinels nor color symbols.
    pub fn other_markers(&self) -> Vec<&Marker> {
        self.markers.iter().filter(|m| m.is_other()).collect()
    }

    /// Merges corner observations whose centers are closer than `threshold`.
    ///
    /// Each physical corner block carries the sentinel on every face, so one
    /// corner is often detected two or three times. Color markers are a
    /// distinct pair, never duplicates, and pass through untouched.
    pub fn combine_nearby_corner_markers(&self, threshold: f64) -> Self {
        let corner_regions: Vec<Region> = self
            .markers
            .iter()
            .filter(|m| m.is_corner())
            .map(|m| m.region)
            .collect();
        let merged = combine_nearby(&corner_regions, threshold);
        debug!(
            "merged {} corner observations into {} corner markers (threshold {:.1})",
            corner_regions.len(),
            merged.len(),
            threshold
        );

        let markers = self
            .markers
            .iter()
            .filter(|m| m.is_color())
            .copied()
            .chain(
                merged
                    .into_iter()
                    .map(|region| Marker::new(MarkerId::CORNER, region)),
            )
            .collect();
        Self { markers }
    }

    /// Returns the regions of every marker, corner and color alike.
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.markers.iter().map(|m| &m.region)
    }

    /// Explains the state of the set.
    ///
    /// The report has errors exactly when [`MarkerSet::valid`] is false;
    /// warnings flag oddities that do not invalidate the set.
    pub fn report(&self) -> MarkerReport {
        let corners = self.corner_markers();
        let colors = self.color_markers();
        let mut report = MarkerReport::new(corners.len(), colors.len());

        if colors.len() != COLOR_MARKER_COUNT {
            report.add(MarkerIssue::error(
                IssueCode::ColorMarkerCount,
                format!(
                    "Found {} color markers, expected {}",
                    colors.len(),
                    COLOR_MARKER_COUNT
                ),
            ));
        }

        if !corners.is_empty() && corners.len() != CORNER_MARKER_COUNT {
            report.add(MarkerIssue::error(
                IssueCode::PartialCornerMarkers,
                format!(
                    "Found {} corner markers, expected 0 or {}",
                    corners.len(),
                    CORNER_MARKER_COUNT
                ),
            ));
        }

        for marker in self.other_markers() {
            if marker.id.is_in_dictionary() {
                report.add(MarkerIssue::warning(
                    IssueCode::UnassignedMarkerId,
                    format!(
                        "Marker id {} is not printed on the rig and was ignored",
                        marker.id
                    ),
                ));
            } else {
                report.add(MarkerIssue::warning(
                    IssueCode::UnknownMarkerId,
                    format!("Marker id {} is outside the marker dictionary", marker.id),
                ));
            }
        }

        if let [a, b] = colors.as_slice() {
            let low_halves = [a.id, b.id].iter().filter(|id| id.as_u8() < 50).count();
            if low_halves != 1 {
                report.add(MarkerIssue::warning(
                    IssueCode::ColorSymbolHalves,
                    format!(
                        "Color symbols {} and {} should be one below 50 and one from 50 up",
                        a.id, b.id
                    ),
                ));
            }
        }

        report.color_id = self.color_id();
        report
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_quad(x: f64, y: f64, size: f64) -> [Point; 4] {
        [
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    fn marker(id: u8, x: f64, y: f64) -> Marker {
        Marker::from_detection(id, &square_quad(x, y, 10.0))
    }

    fn set_with(colors: usize, corners: usize) -> MarkerSet {
        let color_ids = [26u8, 54, 7];
        let mut markers = Vec::new();
        for (i, id) in color_ids.iter().take(colors).enumerate() {
            markers.push(marker(*id, 100.0 + i as f64 * 20.0, 100.0));
        }
        for i in 0..corners {
            markers.push(marker(99, i as f64 * 200.0, 0.0));
        }
        MarkerSet::new(markers)
    }

    #[test]
    fn test_from_detection_empty() {
        let set = MarkerSet::from_detection(&[], &[]);
        assert!(set.is_empty());
        assert!(!set.valid());
    }

    #[test]
    fn test_from_detection_pairs_ids_with_quads() {
        let ids = [MarkerId(99), MarkerId(26)];
        let quads = [square_quad(0.0, 0.0, 10.0), square_quad(50.0, 50.0, 5.0)];
        let set = MarkerSet::from_detection(&ids, &quads);
        assert_eq!(set.len(), 2);
        assert_eq!(set.markers()[1].id, MarkerId(26));
        assert_eq!(
            set.markers()[1].region,
            Region::from_xyxy(50.0, 50.0, 55.0, 55.0)
        );
    }

    #[test]
    fn test_from_detection_ignores_surplus() {
        let ids = [MarkerId(1), MarkerId(2), MarkerId(3)];
        let quads = [square_quad(0.0, 0.0, 10.0)];
        assert_eq!(MarkerSet::from_detection(&ids, &quads).len(), 1);
    }

    #[test]
    fn test_role_partition() {
        let set = set_with(2, 3);
        assert_eq!(set.color_markers().len(), 2);
        assert_eq!(set.corner_markers().len(), 3);
    }

    #[test]
    fn test_valid_configurations() {
        assert!(set_with(2, 0).valid());
        assert!(set_with(2, 4).valid());
        assert!(!set_with(2, 2).valid());
        assert!(!set_with(1, 0).valid());
        assert!(!set_with(3, 4).valid());
    }

    #[test]
    fn test_color_id_only_when_valid() {
        assert_eq!(set_with(2, 0).color_id(), Some(ColorId(226)));
        assert_eq!(set_with(2, 4).color_id(), Some(ColorId(226)));
        assert_eq!(set_with(2, 1).color_id(), None);
        assert_eq!(set_with(1, 0).color_id(), None);
    }

    #[test]
    fn test_color_id_ignores_detection_order() {
        let forward = MarkerSet::new(vec![marker(26, 0.0, 0.0), marker(54, 50.0, 0.0)]);
        let reversed = MarkerSet::new(vec![marker(54, 50.0, 0.0), marker(26, 0.0, 0.0)]);
        assert_eq!(forward.color_id(), reversed.color_id());
    }

    #[test]
    fn test_combine_nearby_corner_markers() {
        // Corner block seen on two faces, plus three lone corners.
        let set = MarkerSet::new(vec![
            marker(99, 0.0, 0.0),
            marker(99, 6.0, 2.0),
            marker(99, 500.0, 0.0),
            marker(99, 0.0, 500.0),
            marker(99, 500.0, 500.0),
            marker(26, 240.0, 240.0),
            marker(54, 260.0, 240.0),
        ]);
        assert!(!set.valid());

        let combined = set.combine_nearby_corner_markers(50.0);
        assert_eq!(combined.corner_markers().len(), 4);
        assert_eq!(combined.color_markers().len(), 2);
        assert!(combined.valid());
        assert!(combined
            .corner_markers()
            .iter()
            .any(|m| m.region == Region::from_xyxy(0.0, 0.0, 16.0, 12.0)));
    }

    #[test]
    fn test_combine_never_merges_color_markers() {
        let set = MarkerSet::new(vec![marker(26, 0.0, 0.0), marker(54, 1.0, 1.0)]);
        let combined = set.combine_nearby_corner_markers(100.0);
        assert_eq!(combined.color_markers().len(), 2);
    }

    #[test]
    fn test_report_matches_valid() {
        for (colors, corners) in [(2, 0), (2, 4), (2, 2), (1, 0), (0, 4), (3, 1)] {
            let set = set_with(colors, corners);
            assert_eq!(set.report().is_ok(), set.valid(), "{colors}+{corners}");
        }
    }

    #[test]
    fn test_report_issue_codes() {
        let report = set_with(1, 2).report();
        assert_eq!(report.error_count(), 2);
        assert!(report.has_code(IssueCode::ColorMarkerCount));
        assert!(report.has_code(IssueCode::PartialCornerMarkers));
        assert_eq!(report.color_id, None);
    }

    #[test]
    fn test_symbols_outside_dictionary_are_not_color_markers() {
        let set = MarkerSet::new(vec![marker(26, 0.0, 0.0), marker(154, 50.0, 0.0)]);
        assert_eq!(set.color_markers().len(), 1);
        assert!(!set.valid());
        assert_eq!(set.color_id(), None);
        assert!(set.report().has_code(IssueCode::UnknownMarkerId));
    }

    #[test]
    fn test_unassigned_id_does_not_spoil_color_pair() {
        let set = MarkerSet::new(vec![
            marker(26, 0.0, 0.0),
            marker(54, 50.0, 0.0),
            marker(95, 100.0, 0.0),
        ]);
        assert_eq!(set.color_markers().len(), 2);
        assert_eq!(set.other_markers().len(), 1);
        assert!(set.valid());
        assert_eq!(set.color_id(), Some(ColorId(226)));

        let report = set.report();
        assert!(report.is_ok());
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_code(IssueCode::UnassignedMarkerId));
    }

    #[test]
    fn test_unassigned_id_is_not_a_color_symbol() {
        let set = MarkerSet::new(vec![marker(26, 0.0, 0.0), marker(95, 50.0, 0.0)]);
        assert!(!set.valid());
        assert_eq!(set.color_id(), None);

        let report = set.report();
        assert!(report.has_code(IssueCode::ColorMarkerCount));
        assert!(report.has_code(IssueCode::UnassignedMarkerId));
    }

    #[test]
    fn test_report_warns_on_same_half_symbols() {
        let set = MarkerSet::new(vec![marker(3, 0.0, 0.0), marker(4, 50.0, 0.0)]);
        let report = set.report();
        assert!(report.is_ok());
        assert!(report.has_code(IssueCode::ColorSymbolHalves));
        assert_eq!(report.color_id, Some(ColorId(7)));
    }
}
