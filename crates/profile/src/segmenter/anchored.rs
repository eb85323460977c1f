use crate::{
    config::AnchoredConfig,
    geometry::{GeoPoint, distance},
    gradient::{GradientLevel, GradientPolicy, level_between},
};

use super::{Partitioner, Segment};

/// Splits the track wherever the gradient level between consecutive altitude
/// anchors changes.
///
/// Anchors are the altitude-bearing points that lie outside the fuzzy range of
/// the previously kept anchor; dense altitude samples (SRTM-derived tracks in
/// particular) would otherwise flip the level every few meters. Points before
/// the first anchor and after the last one get flat segments of their own.
///
/// With normalization on, a span shorter than the minimum normalization
/// distance is never closed; it keeps growing and its level is re-measured
/// over the wider window instead.
#[derive(Debug, Clone)]
pub struct AnchoredPartitioner {
    policy: GradientPolicy,
    normalize: bool,
    min_distance: f64,

    anchors: Vec<GeoPoint>,
    anchor_indices: Vec<usize>,
    last_point: Option<GeoPoint>,
    /// Along-track distance walked since the last anchor.
    since_anchor: f64,

    /// Anchor index where the open span starts.
    start: usize,
    /// Anchor index where the most recently closed span started.
    previous_start: usize,
    /// Along-track length of the open span.
    length: f64,
    running: GradientLevel,

    segments: Vec<Segment>,
    closed_spans: usize,
}

impl AnchoredPartitioner {
    pub fn new(config: AnchoredConfig, track_length: f64) -> Self {
        Self {
            policy: config.policy,
            normalize: config.normalize,
            min_distance: config.min_normalization_distance(track_length),
            anchors: Vec::new(),
            anchor_indices: Vec::new(),
            last_point: None,
            since_anchor: 0.0,
            start: 0,
            previous_start: 0,
            length: 0.0,
            running: GradientLevel::FLAT,
            segments: Vec::new(),
            closed_spans: 0,
        }
    }

    fn is_short(&self, length: f64) -> bool {
        self.normalize && length < self.min_distance
    }

    fn next_anchor(&mut self, index: usize, point: GeoPoint, walked: f64) {
        self.anchors.push(point);
        self.anchor_indices.push(index);

        let i = self.anchors.len() - 1;
        match i {
            0 => {
                if index > 0 {
                    self.segments.push(Segment::new(0, index, GradientLevel::FLAT));
                }
            }
            1 => {
                self.length = walked;
                self.running = level_between(self.policy, &self.anchors[..=1]);
            }
            _ => {
                let level = level_between(self.policy, &self.anchors[i - 1..=i]);
                if level != self.running {
                    if self.is_short(self.length) {
                        self.running = level_between(self.policy, &self.anchors[self.start..=i]);
                    } else {
                        self.segments.push(Segment::new(
                            self.anchor_indices[self.start],
                            self.anchor_indices[i - 1],
                            self.running,
                        ));
                        self.closed_spans += 1;
                        self.previous_start = self.start;
                        self.start = i - 1;
                        self.length = 0.0;
                        self.running = level;
                    }
                }
                self.length += walked;
            }
        }
    }
}

impl Partitioner for AnchoredPartitioner {
    fn next_point(&mut self, index: usize, point: &GeoPoint) {
        if let Some(previous) = self.last_point.replace(*point) {
            self.since_anchor += distance(&previous, point);
        }

        if !point.has_altitude() {
            return;
        }
        if let Some(anchor) = self.anchors.last() {
            if distance(anchor, point) < AnchoredConfig::FUZZY_RANGE_METERS {
                return;
            }
        }

        let walked = std::mem::take(&mut self.since_anchor);
        self.next_anchor(index, *point, walked);
    }

    fn finish(mut self, track: &[GeoPoint]) -> Vec<Segment> {
        let Some(last_index) = track.len().checked_sub(1) else {
            return Vec::new();
        };
        if self.anchors.len() < 2 {
            return vec![Segment::new(0, last_index, GradientLevel::FLAT)];
        }

        let last_anchor = self.anchor_indices[self.anchor_indices.len() - 1];
        if self.is_short(self.length) {
            // fold the short tail back into the span before it, but never into
            // the leading flat segment
            let joint_start = if self.closed_spans > 0 {
                self.segments.pop();
                self.previous_start
            } else {
                self.start
            };
            let level = level_between(self.policy, &self.anchors[joint_start..]);
            self.segments.push(Segment::new(
                self.anchor_indices[joint_start],
                last_anchor,
                level,
            ));
        } else {
            self.segments.push(Segment::new(
                self.anchor_indices[self.start],
                last_anchor,
                self.running,
            ));
        }

        if last_anchor < last_index {
            self.segments
                .push(Segment::new(last_anchor, last_index, GradientLevel::FLAT));
        }

        tracing::debug!(
            anchors = self.anchors.len(),
            min_distance = self.min_distance,
            segments = self.segments.len(),
            "anchored partition"
        );
        self.segments
    }
}
