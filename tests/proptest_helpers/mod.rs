#![allow(dead_code)]

use brickmark::geom::Region;
use brickmark::marker::{Marker, MarkerId, MarkerSet};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for coordinates produced by a handful of additions.
pub const EPS: f64 = 1e-6;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn approx_eq(a: &Region, b: &Region, eps: f64) -> bool {
    (a.x1 - b.x1).abs() <= eps
        && (a.y1 - b.y1).abs() <= eps
        && (a.x2 - b.x2).abs() <= eps
        && (a.y2 - b.y2).abs() <= eps
}

/// An ordered region inside a 4000x3000 photograph.
pub fn arb_region() -> impl Strategy<Value = Region> {
    (0.0..3900.0f64, 0.0..2900.0f64, 1.0..100.0f64, 1.0..100.0f64)
        .prop_map(|(x, y, w, h)| Region::from_upper_left(x, y, w, h))
}

pub fn arb_regions(max: usize) -> impl Strategy<Value = Vec<Region>> {
    prop::collection::vec(arb_region(), 0..=max)
}

/// A symbol printed on a color card.
pub fn arb_color_symbol() -> impl Strategy<Value = MarkerId> {
    (0u8..=90).prop_map(MarkerId)
}

/// Dictionary ids never printed on the rig.
pub fn arb_unassigned_id() -> impl Strategy<Value = MarkerId> {
    (91u8..99).prop_map(MarkerId)
}

pub fn arb_marker() -> impl Strategy<Value = Marker> {
    (
        prop_oneof![
            2 => Just(MarkerId::CORNER),
            2 => arb_color_symbol(),
            1 => arb_unassigned_id(),
        ],
        arb_region(),
    )
        .prop_map(|(id, region)| Marker::new(id, region))
}

pub fn arb_marker_set(max: usize) -> impl Strategy<Value = MarkerSet> {
    prop::collection::vec(arb_marker(), 0..=max).prop_map(MarkerSet::new)
}
