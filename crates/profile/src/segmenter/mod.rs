//! Partitioning of a track into contiguous, gradient-labeled segments.
//!
//! Each strategy is a [`Partitioner`]: an explicit state object fed one point
//! at a time and asked for its segments once the track is exhausted.
//! Segments are index ranges into the caller's points. Consecutive segments
//! share their boundary point, so `segments[i].end == segments[i + 1].start`.

mod anchored;
mod fixed_buffer;

use std::ops::RangeInclusive;

pub use anchored::AnchoredPartitioner;
pub use fixed_buffer::FixedBufferPartitioner;

use crate::{
    config::{ProfileConfig, Strategy},
    geometry::{GeoPoint, cumulative_distance},
    gradient::GradientLevel,
};

/// A run of consecutive track points sharing one gradient level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the first point, inclusive.
    pub start: usize,
    /// Index of the last point, inclusive.
    pub end: usize,
    pub level: GradientLevel,
}

impl Segment {
    pub fn new(start: usize, end: usize, level: GradientLevel) -> Self {
        debug_assert!(start <= end, "segment {start}..={end} is reversed");
        Self { start, end, level }
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn point_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// The segment's points within the track it was cut from.
    pub fn points<'a>(&self, track: &'a [GeoPoint]) -> &'a [GeoPoint] {
        &track[self.range()]
    }
}

pub trait Partitioner {
    fn next_point(&mut self, index: usize, point: &GeoPoint);
    fn finish(self, track: &[GeoPoint]) -> Vec<Segment>;
}

/// Feed every point of `track` through `partitioner`, in order.
pub fn partition<P: Partitioner>(mut partitioner: P, track: &[GeoPoint]) -> Vec<Segment> {
    for (index, point) in track.iter().enumerate() {
        partitioner.next_point(index, point);
    }
    partitioner.finish(track)
}

/// Split `points` into segments using the configured strategy.
///
/// An empty track has no segments; a single point is one flat segment.
pub fn segment_track(points: &[GeoPoint], config: &ProfileConfig) -> Vec<Segment> {
    if points.is_empty() {
        return Vec::new();
    }

    let track_length = cumulative_distance(points);
    let segments = match config.strategy {
        Strategy::FixedBuffer(options) => {
            partition(FixedBufferPartitioner::new(options, track_length), points)
        }
        Strategy::Anchored(options) => {
            partition(AnchoredPartitioner::new(options, track_length), points)
        }
    };

    tracing::debug!(
        points = points.len(),
        segments = segments.len(),
        track_length,
        "segmented track"
    );
    segments
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Segment;
    use crate::geometry::GeoPoint;

    /// Meters per degree of latitude for the haversine radius in use.
    pub const METERS_PER_DEGREE: f64 = 6_371_008.8 * std::f64::consts::PI / 180.0;

    /// Points heading due north from the equator, one per `(offset_m, altitude)`.
    pub fn northbound(samples: &[(f64, Option<f64>)]) -> Vec<GeoPoint> {
        samples
            .iter()
            .map(|&(offset, altitude)| GeoPoint::new(offset / METERS_PER_DEGREE, 0.0, altitude))
            .collect()
    }

    /// Total coordinates minus the shared boundaries must equal the input.
    pub fn assert_adjacent(segments: &[Segment], len: usize) {
        assert_eq!(segments.first().map(|s| s.start), Some(0));
        assert_eq!(segments.last().map(|s| s.end), Some(len - 1));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "segments {pair:?} are not adjacent");
        }
        let covered: usize = segments.iter().map(Segment::point_count).sum();
        assert_eq!(covered - (segments.len() - 1), len);
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{assert_adjacent, northbound};
    use super::*;
    use crate::config::{AnchoredConfig, FixedBufferConfig};

    fn configs() -> Vec<ProfileConfig> {
        vec![
            ProfileConfig {
                interpolate_elevation: false,
                strategy: Strategy::FixedBuffer(FixedBufferConfig::default()),
            },
            ProfileConfig {
                interpolate_elevation: false,
                strategy: Strategy::Anchored(AnchoredConfig::default()),
            },
            ProfileConfig {
                interpolate_elevation: false,
                strategy: Strategy::Anchored(AnchoredConfig {
                    normalize: true,
                    chart_width_pixels: 20.0,
                    ..Default::default()
                }),
            },
        ]
    }

    #[test]
    fn test_empty_track_has_no_segments() {
        for config in configs() {
            assert!(segment_track(&[], &config).is_empty());
        }
    }

    #[test]
    fn test_single_point_is_one_flat_segment() {
        let points = northbound(&[(0.0, Some(100.0))]);
        for config in configs() {
            let segments = segment_track(&points, &config);
            assert_eq!(segments, vec![Segment::new(0, 0, GradientLevel::FLAT)]);
        }
    }

    #[test]
    fn test_all_missing_altitude_is_one_flat_segment() {
        let points = northbound(&[(0.0, None), (100.0, None), (250.0, None), (400.0, None)]);
        for config in configs() {
            let segments = segment_track(&points, &config);
            assert_eq!(segments, vec![Segment::new(0, 3, GradientLevel::FLAT)]);
        }
    }

    #[test]
    fn test_segments_are_adjacent_for_every_strategy() {
        let samples: Vec<(f64, Option<f64>)> = (0..60)
            .map(|i| {
                let offset = f64::from(i) * 45.0;
                let altitude = match i % 7 {
                    0 => None,
                    _ => Some(100.0 + (f64::from(i) * 0.7).sin() * 25.0),
                };
                (offset, altitude)
            })
            .collect();
        let points = northbound(&samples);

        for config in configs() {
            let segments = segment_track(&points, &config);
            assert!(!segments.is_empty());
            assert_adjacent(&segments, points.len());
        }
    }

    #[test]
    fn test_segment_points_slice() {
        let points = northbound(&[(0.0, Some(1.0)), (10.0, Some(2.0)), (20.0, Some(3.0))]);
        let segment = Segment::new(1, 2, GradientLevel::FLAT);
        assert_eq!(segment.points(&points), &points[1..=2]);
        assert_eq!(segment.point_count(), 2);
    }
}
