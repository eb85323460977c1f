//! End-to-end runs of the profile engine over synthetic tracks.

use bytes::Bytes;
use profile::{
    AnchoredConfig, FixedBufferConfig, GradientLevel, GradientPolicy, ProfileConfig, Strategy,
    build_features,
    features::FeatureCollection,
    file_parsers::{FileType, parse_track_file},
    geometry::GeoPoint,
};
use rand::{SeedableRng, rngs::StdRng};
use test_data::prelude::*;

fn anchored(normalize: bool, interpolate: bool) -> ProfileConfig {
    ProfileConfig {
        interpolate_elevation: interpolate,
        strategy: Strategy::Anchored(AnchoredConfig {
            normalize,
            ..Default::default()
        }),
    }
}

fn fixed_buffer(interpolate: bool) -> ProfileConfig {
    ProfileConfig {
        interpolate_elevation: interpolate,
        strategy: Strategy::FixedBuffer(FixedBufferConfig::default()),
    }
}

fn levels(collection: &FeatureCollection) -> Vec<i8> {
    collection.features.iter().map(|f| f.level().value()).collect()
}

/// Adjacent features share their boundary coordinate.
fn assert_covers(collection: &FeatureCollection, points: &[GeoPoint]) {
    let features = &collection.features;
    assert_eq!(collection.properties.record_count, features.len());
    if points.is_empty() {
        assert!(features.is_empty());
        return;
    }
    let total: usize = features.iter().map(|f| f.coordinates().len()).sum();
    assert_eq!(total - (features.len() - 1), points.len());

    for pair in features.windows(2) {
        assert_eq!(pair[0].coordinates().last(), pair[1].coordinates().first());
    }
}

fn col_du_test() -> Vec<GeoPoint> {
    PatternBuilder::new(45.0, 6.3)
        .base_altitude(800.0)
        .flat(1_000.0)
        .climb(2_000.0, 8.0)
        .descent(1_000.0, 6.0)
        .build()
}

#[test]
fn test_anchored_profile_follows_the_legs() {
    let points = col_du_test();
    let output = build_features(&points, &ProfileConfig::default());
    let collection = &output[0];

    assert_covers(collection, &points);
    assert_eq!(levels(collection), vec![0, 8, -6]);
    assert_eq!(collection.features[0].coordinates().len(), 11);
    assert_eq!(collection.features[1].coordinates().len(), 21);
    assert_eq!(collection.features[2].coordinates().len(), 11);
}

#[test]
fn test_fixed_buffer_profile_keeps_leg_order() {
    let points = col_du_test();
    let output = build_features(&points, &fixed_buffer(false));
    let collection = &output[0];
    assert_covers(collection, &points);

    let levels = levels(collection);
    assert_eq!(levels.first(), Some(&0));
    assert_eq!(levels.last(), Some(&-2));
    assert!(levels.contains(&3));
    assert!(levels.iter().all(|l| (-5..=5).contains(l)));
    for pair in levels.windows(2) {
        assert_ne!(pair[0], pair[1], "equal neighbours must be merged");
    }
}

#[test]
fn test_dropped_altitudes_are_interpolated() {
    let reference = col_du_test();
    let mut points = reference.clone();
    drop_altitudes(&mut points, 15..18);
    drop_altitudes(&mut points, 0..3);

    let output = build_features(&points, &anchored(false, true));
    let collection = &output[0];
    assert_covers(collection, &points);
    // the unmeasured lead gets its own flat feature
    assert_eq!(levels(collection), vec![0, 0, 8, -6]);
    assert_eq!(collection.features[0].coordinates().len(), 4);

    let coordinates: Vec<_> = collection
        .features
        .iter()
        .flat_map(|f| f.coordinates().iter())
        .collect();
    assert!(coordinates.iter().all(|c| c.altitude.is_some()));

    // leading gap takes the first known altitude
    assert_eq!(coordinates[0].altitude, Some(800.0));

    // the climb starts at point 10, so point 16 is its seventh coordinate
    let climb = collection.features[2].coordinates();
    let filled = climb[6].altitude.unwrap();
    let expected = reference[16].altitude.unwrap();
    assert!((filled - expected).abs() <= 0.1 + 1e-9, "{filled} vs {expected}");
}

#[test]
fn test_without_interpolation_gaps_stay_two_dimensional() {
    let mut points = col_du_test();
    drop_altitudes(&mut points, 15..18);

    let output = build_features(&points, &anchored(false, false));
    let json = serde_json::to_value(&output).unwrap();
    let climb = &json[0]["features"][1]["geometry"]["coordinates"];
    assert_eq!(climb[4].as_array().unwrap().len(), 3);
    assert_eq!(climb[5].as_array().unwrap().len(), 2);
}

#[test]
fn test_normalization_reduces_sawtooth_fragmentation() {
    let points = PatternBuilder::new(45.0, 6.3)
        .spacing(50.0)
        .flat(10_000.0)
        .sawtooth(3, 50.0, 4.0)
        .flat(10_000.0)
        .build();

    let plain = build_features(&points, &anchored(false, false));
    let normalized = build_features(&points, &anchored(true, false));

    assert_covers(&plain[0], &points);
    assert_covers(&normalized[0], &points);
    assert!(normalized[0].features.len() < plain[0].features.len());
}

#[test]
fn test_procedural_tracks_hold_invariants() {
    for seed in 0..5u32 {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let points = ProceduralGenerator::new(seed)
            .with_distance(8_000.0)
            .with_dropouts(DropoutConfig {
                probability: 0.05,
                max_run: 6,
                missing_lead: 4,
                missing_tail: 3,
            })
            .generate(&mut rng)
            .unwrap();

        for config in [
            anchored(false, true),
            anchored(true, true),
            fixed_buffer(true),
            fixed_buffer(false),
        ] {
            let output = build_features(&points, &config);
            assert_eq!(output.len(), 1);
            let collection = &output[0];
            assert_covers(collection, &points);

            let limit = match config.strategy.policy() {
                GradientPolicy::Banded => 5,
                GradientPolicy::Linear => GradientPolicy::LINEAR_LIMIT,
            };
            assert!(levels(collection).iter().all(|l| l.abs() <= limit));

            if config.interpolate_elevation {
                for feature in &collection.features {
                    assert!(feature.coordinates().iter().all(|c| c.altitude.is_some()));
                }
            }
        }
    }
}

#[test]
fn test_flat_terrain_is_one_flat_feature() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = ProceduralGenerator::for_region(Region::FLANDERS, 3)
        .with_terrain(ElevationGenerator::lowland(3).with_relief(0.0))
        .with_config(TrackConfig {
            bounds: Region::FLANDERS,
            elevation_jitter_m: 0.0,
            dropouts: DropoutConfig::NONE,
            ..Default::default()
        })
        .generate(&mut rng)
        .unwrap();

    let output = build_features(&points, &fixed_buffer(false));
    assert_eq!(levels(&output[0]), vec![GradientLevel::FLAT.value()]);
}

#[test]
fn test_gpx_round_trip_through_parser() {
    let mut points = col_du_test();
    drop_altitudes(&mut points, 5..7);

    let gpx = write_gpx(&points, "Col du Test");
    let bytes = Bytes::from(gpx.into_bytes());
    assert_eq!(FileType::detect_from_bytes(&bytes), Some(FileType::Gpx));

    let parsed = parse_track_file(FileType::Gpx, bytes).unwrap();
    assert_eq!(parsed.len(), points.len());
    for (original, read) in points.iter().zip(&parsed) {
        assert!((original.latitude - read.latitude).abs() < 1e-6);
        assert!((original.longitude - read.longitude).abs() < 1e-6);
        match (original.altitude, read.altitude) {
            (Some(a), Some(b)) => assert!((a - b).abs() < 0.01),
            (None, None) => {}
            other => panic!("altitude mismatch {other:?}"),
        }
    }

    let direct = build_features(&points, &ProfileConfig::default());
    let via_gpx = build_features(&parsed, &ProfileConfig::default());
    assert_eq!(levels(&direct[0]), levels(&via_gpx[0]));
}
