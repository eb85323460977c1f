//! Configuration for profile generation and for the HTTP server.

use std::env;

use serde::{Deserialize, Serialize};

use crate::gradient::GradientPolicy;

/// Options for one call to [`crate::features::build_features`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Fill in missing altitudes before emitting coordinates. The chart
    /// breaks on points without altitude, so callers feeding it usually
    /// want this on.
    pub interpolate_elevation: bool,

    pub strategy: Strategy,
}

/// How the track is partitioned into segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Partition into buffers of a target length, then merge neighbours with
    /// the same level.
    FixedBuffer(FixedBufferConfig),
    /// Partition at gradient changes between de-noised altitude anchors.
    Anchored(AnchoredConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Anchored(AnchoredConfig::default())
    }
}

impl Strategy {
    pub fn policy(&self) -> GradientPolicy {
        match self {
            Strategy::FixedBuffer(c) => c.policy,
            Strategy::Anchored(c) => c.policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedBufferConfig {
    /// Number of buffers the track is broken into. A high count with long
    /// enough buffers normalizes best; too few ignores altitude in the middle.
    pub segment_count: u32,

    /// Minimum buffer length in meters. Matters on short tracks, where the
    /// count alone would produce buffers too short to carry a reliable grade.
    pub min_segment_distance_meters: f64,

    pub policy: GradientPolicy,
}

impl FixedBufferConfig {
    pub const DEFAULT_SEGMENT_COUNT: u32 = 200;
    pub const MIN_SEGMENT_COUNT: u32 = 10;
    pub const DEFAULT_MIN_SEGMENT_DISTANCE: f64 = 200.0;
    pub const MIN_MIN_SEGMENT_DISTANCE: f64 = 50.0;

    /// Values below their floors are raised to the floor, never rejected.
    pub fn clamped(self) -> Self {
        let segment_count = if self.segment_count < Self::MIN_SEGMENT_COUNT {
            tracing::debug!(
                requested = self.segment_count,
                "segment count below floor, using {}",
                Self::MIN_SEGMENT_COUNT
            );
            Self::MIN_SEGMENT_COUNT
        } else {
            self.segment_count
        };

        // NaN fails the comparison too
        let min_segment_distance_meters =
            if self.min_segment_distance_meters >= Self::MIN_MIN_SEGMENT_DISTANCE {
                self.min_segment_distance_meters
            } else {
                tracing::debug!(
                    requested = self.min_segment_distance_meters,
                    "min segment distance below floor, using {}",
                    Self::MIN_MIN_SEGMENT_DISTANCE
                );
                Self::MIN_MIN_SEGMENT_DISTANCE
            };

        Self {
            segment_count,
            min_segment_distance_meters,
            policy: self.policy,
        }
    }
}

impl Default for FixedBufferConfig {
    fn default() -> Self {
        Self {
            segment_count: Self::DEFAULT_SEGMENT_COUNT,
            min_segment_distance_meters: Self::DEFAULT_MIN_SEGMENT_DISTANCE,
            policy: GradientPolicy::Banded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchoredConfig {
    /// Merge features too short to be visible on the chart.
    pub normalize: bool,

    /// Width of the chart element in pixels.
    pub chart_width_pixels: f64,

    /// Narrowest feature, in pixels, allowed on the chart when normalizing.
    pub min_normalization_width_pixels: f64,

    pub policy: GradientPolicy,
}

impl AnchoredConfig {
    pub const DEFAULT_CHART_WIDTH: f64 = 1600.0;
    pub const DEFAULT_MIN_NORMALIZATION_WIDTH: f64 = 5.0;

    /// Anchors closer than this to the previous anchor are dropped.
    pub const FUZZY_RANGE_METERS: f64 = 30.0;

    /// Shortest feature length, in meters, that survives normalization on a
    /// track of `track_length` meters. Zero when normalization is off.
    pub fn min_normalization_distance(&self, track_length: f64) -> f64 {
        if !self.normalize {
            return 0.0;
        }
        let chart_width = positive_or(self.chart_width_pixels, Self::DEFAULT_CHART_WIDTH);
        let min_width = positive_or(
            self.min_normalization_width_pixels,
            Self::DEFAULT_MIN_NORMALIZATION_WIDTH,
        );
        min_width * track_length / chart_width
    }
}

impl Default for AnchoredConfig {
    fn default() -> Self {
        Self {
            normalize: false,
            chart_width_pixels: Self::DEFAULT_CHART_WIDTH,
            min_normalization_width_pixels: Self::DEFAULT_MIN_NORMALIZATION_WIDTH,
            policy: GradientPolicy::Linear,
        }
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        tracing::debug!(value, "non-positive pixel width, using {default}");
        default
    }
}

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3001;
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::DEFAULT_PORT);

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|b| b.parse().ok())
            .unwrap_or(Self::DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            port,
            max_upload_bytes,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Self::DEFAULT_PORT,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
