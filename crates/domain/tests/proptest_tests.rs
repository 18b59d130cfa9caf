//! Property-based tests for coordinates, geometry and product sets
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{Point, Product, ProductSet, from_fixed_point, polyline, to_fixed_point};
use proptest::prelude::*;

// ============================================================================
// Fixed-point Property Tests
// ============================================================================

mod fixed_point_tests {
    use super::*;

    proptest! {
        #[test]
        fn integer_round_trip_is_exact(n in any::<i32>()) {
            prop_assert_eq!(to_fixed_point(from_fixed_point(n)), n);
        }

        #[test]
        fn degrees_round_trip_within_half_micro_degree(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let point = Point::from_degrees(lat, lon).unwrap();
            prop_assert!((point.latitude() - lat).abs() <= 0.000_000_5 + 1e-9);
            prop_assert!((point.longitude() - lon).abs() <= 0.000_000_5 + 1e-9);
        }

        #[test]
        fn out_of_range_latitude_rejected(
            lat in prop_oneof![(-1000.0f64..-90.1f64), (90.1f64..1000.0f64)],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(Point::from_degrees(lat, lon).is_err());
        }

        #[test]
        fn distance_is_symmetric_and_non_negative(
            lat1 in -90_000_000i32..=90_000_000i32,
            lon1 in -180_000_000i32..=180_000_000i32,
            lat2 in -90_000_000i32..=90_000_000i32,
            lon2 in -180_000_000i32..=180_000_000i32
        ) {
            let a = Point::from_e6(lat1, lon1);
            let b = Point::from_e6(lat2, lon2);
            let ab = a.distance_m(&b);
            let ba = b.distance_m(&a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn serialization_roundtrip(
            lat in -90_000_000i32..=90_000_000i32,
            lon in -180_000_000i32..=180_000_000i32
        ) {
            let point = Point::from_e6(lat, lon);
            let json = serde_json::to_string(&point).unwrap();
            let back: Point = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(point, back);
        }
    }
}

// ============================================================================
// Polyline Property Tests
// ============================================================================

mod polyline_tests {
    use super::*;

    fn format_precision_point() -> impl Strategy<Value = Point> {
        (-9_000_000i32..=9_000_000i32, -18_000_000i32..=18_000_000i32)
            .prop_map(|(lat, lon)| Point::from_e6(lat * 10, lon * 10))
    }

    proptest! {
        #[test]
        fn decode_is_deterministic(input in "[?-~]{0,64}") {
            prop_assert_eq!(polyline::decode(&input), polyline::decode(&input));
        }

        #[test]
        fn decode_never_panics_on_arbitrary_text(input in ".{0,128}") {
            let _ = polyline::decode(&input);
        }

        #[test]
        fn points_at_format_precision_survive_encoding(
            points in prop::collection::vec(format_precision_point(), 0..50)
        ) {
            let encoded = polyline::encode(&points);
            prop_assert!(encoded.bytes().all(|b| (63..=126).contains(&b)));
            prop_assert_eq!(polyline::decode(&encoded), points);
        }

        #[test]
        fn truncation_yields_a_prefix(
            points in prop::collection::vec(format_precision_point(), 1..20),
            cut in 0usize..200
        ) {
            let encoded = polyline::encode(&points);
            let cut = cut.min(encoded.len());
            let decoded = polyline::decode(&encoded[..cut]);
            prop_assert!(decoded.len() <= points.len());
            prop_assert_eq!(&points[..decoded.len()], &decoded[..]);
        }
    }
}

// ============================================================================
// ProductSet Property Tests
// ============================================================================

mod product_set_tests {
    use super::*;

    proptest! {
        #[test]
        fn bits_round_trip(bits in any::<u8>()) {
            let set = ProductSet::from_bits(bits);
            prop_assert_eq!(set.bits(), bits & ProductSet::ALL.bits());
            prop_assert_eq!(ProductSet::from_bits(set.bits()), set);
        }

        #[test]
        fn string_round_trip(bits in 0u8..=0b0111_1111) {
            let set = ProductSet::from_bits(bits);
            let parsed: ProductSet = set.to_string().parse().unwrap();
            prop_assert_eq!(parsed, set);
        }

        #[test]
        fn iteration_matches_membership(bits in 0u8..=0b0111_1111) {
            let set = ProductSet::from_bits(bits);
            let listed: Vec<Product> = set.iter().collect();
            prop_assert_eq!(listed.len(), set.len() as usize);
            for product in Product::ALL {
                prop_assert_eq!(set.contains(product), listed.contains(&product));
            }
        }
    }
}
