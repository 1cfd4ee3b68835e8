//! Single-linkage merging of nearby regions.
//!
//! A fiducial glued to every face of a box is seen once per visible face.
//! Those observations sit close together in the photograph and describe
//! one logical marker, so they are folded into a single region here.

use std::cmp::Ordering;

use super::region::Region;

/// Repeatedly merges regions whose centers are closer than `threshold`
/// until no such pair remains.
///
/// Merging uses [`Region::combine`], so a merged cluster keeps growing and
/// its center moves; a region that was out of reach of each member can be
/// within reach of the merged box, or the other way round. To keep the
/// outcome independent of input order, the globally closest pair is merged
/// first (ties go to the pair that sorts first by coordinates) and the
/// result is sorted by coordinates.
pub fn combine_nearby(regions: &[Region], threshold: f64) -> Vec<Region> {
    let mut clusters: Vec<Region> = regions.to_vec();
    clusters.sort_by(cmp_coords);

    while let Some((i, j)) = closest_pair_within(&clusters, threshold) {
        let merged = clusters[i].combine(&clusters[j]);
        // j > i, so removing j first keeps i valid
        clusters.remove(j);
        clusters[i] = merged;
        clusters.sort_by(cmp_coords);
    }

    clusters
}

fn closest_pair_within(clusters: &[Region], threshold: f64) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..clusters.len() {
        let center_i = clusters[i].center();
        for j in (i + 1)..clusters.len() {
            let distance = center_i.distance(&clusters[j].center());
            if distance >= threshold {
                continue;
            }
            if best.map_or(true, |(_, _, best_distance)| distance < best_distance) {
                best = Some((i, j, distance));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

/// Total order over regions by (x1, y1, x2, y2).
fn cmp_coords(a: &Region, b: &Region) -> Ordering {
    a.x1.total_cmp(&b.x1)
        .then(a.y1.total_cmp(&b.y1))
        .then(a.x2.total_cmp(&b.x2))
        .then(a.y2.total_cmp(&b.y2))
}
