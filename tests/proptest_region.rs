mod proptest_helpers;

use brickmark::geom::{combine_nearby, Frame, Region};
use proptest::prelude::*;
use proptest_helpers::{approx_eq, arb_region, arb_regions, proptest_config, EPS};

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn grow_then_shrink_restores(r in arb_region(), m in -50.0..50.0f64) {
        prop_assert!(approx_eq(&r.grow(m).grow(-m), &r, EPS));
    }

    #[test]
    fn square_is_minimal_and_centered(r in arb_region()) {
        let s = r.square();
        prop_assert!((s.width() - s.height()).abs() <= EPS);
        prop_assert!((s.width() - r.width().max(r.height())).abs() <= EPS);
        prop_assert!(r.center().distance(&s.center()) <= EPS);
        prop_assert!(r.is_inside(&s.grow(EPS)));
    }

    #[test]
    fn combine_is_commutative_and_contains_both(a in arb_region(), b in arb_region()) {
        let ab = a.combine(&b);
        prop_assert_eq!(ab, b.combine(&a));
        prop_assert!(a.is_inside(&ab));
        prop_assert!(b.is_inside(&ab));
        prop_assert!(ab.area() >= a.area().max(b.area()));
    }

    #[test]
    fn combine_is_associative(a in arb_region(), b in arb_region(), c in arb_region()) {
        prop_assert_eq!(a.combine(&b).combine(&c), a.combine(&b.combine(&c)));
    }

    #[test]
    fn shrink_from_stays_inside(a in arb_region(), b in arb_region()) {
        let shrunk = a.shrink_from(&b);
        prop_assert!(shrunk.is_inside(&a));
        if !a.intersects(&b) {
            prop_assert_eq!(shrunk, a);
        }
    }

    #[test]
    fn combine_nearby_ignores_input_order(
        regions in arb_regions(8),
        threshold in 0.0..500.0f64,
        seed in any::<u64>(),
    ) {
        let mut shuffled = regions.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }
        prop_assert_eq!(combine_nearby(&regions, threshold), combine_nearby(&shuffled, threshold));
    }

    #[test]
    fn combine_nearby_leaves_no_close_pair(regions in arb_regions(8), threshold in 0.0..500.0f64) {
        let merged = combine_nearby(&regions, threshold);
        prop_assert!(merged.len() <= regions.len());
        for (i, a) in merged.iter().enumerate() {
            for b in &merged[i + 1..] {
                prop_assert!(a.center().distance(&b.center()) >= threshold);
            }
        }
        if let Some(union) = Region::union_of(&regions) {
            prop_assert_eq!(Region::union_of(&merged), Some(union));
        }
    }

    #[test]
    fn normalized_roundtrip(r in arb_region()) {
        let frame = Frame::new(4000u32, 3000u32);
        let back = r.to_normalized(frame.width, frame.height).to_pixel(frame.width, frame.height);
        prop_assert!(approx_eq(&back, &r, EPS));
    }

    #[test]
    fn fingerprint_is_six_hex_chars(r in arb_region()) {
        let fp = r.stable_fingerprint();
        prop_assert_eq!(fp.len(), 6);
        prop_assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        prop_assert_eq!(fp, r.stable_fingerprint());
    }
}

#[test]
fn combine_nearby_three_regions_two_clusters() {
    // a and b are 4 apart; c is 30 from the merged pair.
    let a = Region::from_xyxy(0.0, 0.0, 10.0, 10.0);
    let b = Region::from_xyxy(4.0, 0.0, 14.0, 10.0);
    let c = Region::from_xyxy(37.0, 0.0, 47.0, 10.0);
    for input in [[a, b, c], [c, b, a], [b, c, a], [c, a, b]] {
        let merged = combine_nearby(&input, 10.0);
        assert_eq!(
            merged,
            vec![Region::from_xyxy(0.0, 0.0, 14.0, 10.0), c],
            "{input:?}"
        );
    }
}
