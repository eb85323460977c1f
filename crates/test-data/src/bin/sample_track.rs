//! Write a synthetic track to stdout, as GPX or as its gradient profile.
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin sample-track -- procedural --seed 7 --format json
//! ```

use std::io::Write as _;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use profile::{ProfileConfig, build_features, geometry::GeoPoint};
use rand::{SeedableRng, rngs::StdRng};
use test_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// Flat approach, a long 7.5% climb, flat finish
    Climb,
    /// Alternating 6% climbs and descents of 500 m
    Sawtooth,
    /// Random walk over noise terrain
    Procedural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Gpx,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "sample-track",
    about = "Write a synthetic track as GPX, or its gradient profile as JSON"
)]
struct Args {
    /// Track shape
    #[arg(value_enum, default_value_t = Pattern::Procedural)]
    pattern: Pattern,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Gpx)]
    format: Format,

    /// Random seed for procedural tracks
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Track length in meters
    #[arg(long, default_value_t = 10_000.0)]
    distance: f64,
}

fn generate(args: &Args) -> anyhow::Result<Vec<GeoPoint>> {
    let (lat, lon) = Region::ALPS.center();
    let points = match args.pattern {
        Pattern::Climb => PatternBuilder::new(lat, lon)
            .base_altitude(700.0)
            .flat(args.distance * 0.1)
            .climb(args.distance * 0.8, 7.5)
            .flat(args.distance * 0.1)
            .build(),
        Pattern::Sawtooth => {
            let teeth = ((args.distance / 1_000.0).round() as usize).max(1);
            PatternBuilder::new(lat, lon).sawtooth(teeth, 500.0, 6.0).build()
        }
        Pattern::Procedural => {
            let seed = u32::try_from(args.seed % u64::from(u32::MAX))?;
            let mut rng = StdRng::seed_from_u64(args.seed);
            ProceduralGenerator::new(seed)
                .with_distance(args.distance)
                .generate(&mut rng)?
        }
    };
    Ok(points)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let points = generate(&args).context("generating track")?;
    tracing::info!(?args, points = points.len(), "generated track");

    let output = match args.format {
        Format::Gpx => write_gpx(&points, "sample track"),
        Format::Json => {
            let profile = build_features(&points, &ProfileConfig::default());
            serde_json::to_string_pretty(&profile)?
        }
    };

    std::io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sample-track"]).unwrap();
        assert_eq!(args.pattern, Pattern::Procedural);
        assert_eq!(args.format, Format::Gpx);
        assert_eq!(args.seed, 12345);
        assert_eq!(args.distance, 10_000.0);
    }

    #[test]
    fn test_pattern_and_flags() {
        let args = Args::try_parse_from([
            "sample-track",
            "climb",
            "--format",
            "json",
            "--seed",
            "7",
            "--distance",
            "2500",
        ])
        .unwrap();
        assert_eq!(args.pattern, Pattern::Climb);
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.seed, 7);
        assert_eq!(args.distance, 2_500.0);
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Args::try_parse_from(["sample-track", "spiral"]).is_err());
        assert!(Args::try_parse_from(["sample-track", "--format", "kml"]).is_err());
        assert!(Args::try_parse_from(["sample-track", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_help_is_generated() {
        let err = Args::try_parse_from(["sample-track", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_climb_pattern_spans_the_distance() {
        let args = Args::try_parse_from(["sample-track", "climb", "--distance", "2000"]).unwrap();
        let points = generate(&args).unwrap();
        assert!((profile::geometry::cumulative_distance(&points) - 2_000.0).abs() < 1e-6);
    }
}
