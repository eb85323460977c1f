use crate::{
    config::FixedBufferConfig,
    geometry::{GeoPoint, distance},
    gradient::{GradientPolicy, level_between},
};

use super::{Partitioner, Segment};

/// Cuts the track into buffers of at least a target length, each ending on
/// an altitude-bearing point, then merges neighbouring buffers that classify
/// to the same level.
///
/// Altitudes of points close to each other are unreliable, so the grade is
/// only ever measured across a whole buffer.
#[derive(Debug, Clone)]
pub struct FixedBufferPartitioner {
    target_distance: f64,
    policy: GradientPolicy,
    /// Set once the first altitude-bearing point has been seen. Points before
    /// it sit in the first buffer without counting towards its length.
    seeded: bool,
    buffer_start: usize,
    buffer_distance: f64,
    last_point: Option<GeoPoint>,
    closed: Vec<(usize, usize)>,
}

impl FixedBufferPartitioner {
    pub fn new(config: FixedBufferConfig, track_length: f64) -> Self {
        let config = config.clamped();
        let target_distance = (track_length / f64::from(config.segment_count))
            .max(config.min_segment_distance_meters);

        Self {
            target_distance,
            policy: config.policy,
            seeded: false,
            buffer_start: 0,
            buffer_distance: 0.0,
            last_point: None,
            closed: Vec::new(),
        }
    }

    pub fn target_distance(&self) -> f64 {
        self.target_distance
    }
}

impl Partitioner for FixedBufferPartitioner {
    fn next_point(&mut self, index: usize, point: &GeoPoint) {
        let previous = self.last_point.replace(*point);

        if !self.seeded {
            self.seeded = point.has_altitude();
            return;
        }

        if let Some(previous) = previous {
            self.buffer_distance += distance(&previous, point);
        }

        if self.buffer_distance >= self.target_distance && point.has_altitude() {
            self.closed.push((self.buffer_start, index));
            self.buffer_start = index;
            self.buffer_distance = 0.0;
        }
    }

    fn finish(self, track: &[GeoPoint]) -> Vec<Segment> {
        let Some(last_index) = track.len().checked_sub(1) else {
            return Vec::new();
        };

        let mut buffers = self.closed;
        // leftover points join the last buffer, or are the only one
        match buffers.last_mut() {
            Some(last) => last.1 = last_index,
            None => buffers.push((0, last_index)),
        }

        let mut segments: Vec<Segment> = Vec::with_capacity(buffers.len());
        for (start, end) in buffers {
            let level = level_between(self.policy, &track[start..=end]);
            match segments.last_mut() {
                Some(current) if current.level == level => current.end = end,
                _ => segments.push(Segment::new(start, end, level)),
            }
        }

        tracing::debug!(
            target_distance = self.target_distance,
            segments = segments.len(),
            "fixed-buffer partition"
        );
        segments
    }
}
