//! GeoJSON-like output consumed by the elevation chart.
//!
//! The chart reads each feature's gradient level from
//! `properties.attributeType`; the field names here are part of that
//! contract and must not change.

use serde::{Deserialize, Serialize};

use crate::{
    config::ProfileConfig,
    geometry::GeoPoint,
    gradient::GradientLevel,
    ingest::Position,
    interpolation::interpolate_elevation,
    segmenter::segment_track,
};

pub const CREATOR: &str = "gradient-profile";
pub const SUMMARY: &str = "gradient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureKind {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum GeometryKind {
    LineString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionKind {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    kind: GeometryKind,
    pub coordinates: Vec<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(rename = "attributeType")]
    pub attribute_type: GradientLevel,
}

/// One segment of the profile: a line with a single gradient level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: FeatureKind,
    pub geometry: LineString,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn level(&self) -> GradientLevel {
        self.properties.attribute_type
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.geometry.coordinates
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionProperties {
    #[serde(rename = "Creator")]
    pub creator: String,
    #[serde(rename = "records")]
    pub record_count: usize,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: CollectionKind,
    pub features: Vec<Feature>,
    pub properties: CollectionProperties,
}

/// Build a feature from a segment's points, filling in missing altitudes
/// first when `interpolate` is set.
pub fn build_feature(points: &[GeoPoint], level: GradientLevel, interpolate: bool) -> Feature {
    let points = interpolate_elevation(points, interpolate);
    Feature {
        kind: FeatureKind::Feature,
        geometry: LineString {
            kind: GeometryKind::LineString,
            coordinates: points.iter().map(Position::from).collect(),
        },
        properties: FeatureProperties {
            attribute_type: level,
        },
    }
}

pub fn build_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        kind: CollectionKind::FeatureCollection,
        properties: CollectionProperties {
            creator: CREATOR.to_string(),
            record_count: features.len(),
            summary: SUMMARY.to_string(),
        },
        features,
    }
}

/// Convert a track into gradient features.
///
/// Returns a single-element list holding the collection, which is the shape
/// the chart's `addData` expects.
pub fn build_features(points: &[GeoPoint], config: &ProfileConfig) -> Vec<FeatureCollection> {
    let features = segment_track(points, config)
        .iter()
        .map(|segment| {
            build_feature(
                segment.points(points),
                segment.level,
                config.interpolate_elevation,
            )
        })
        .collect();

    vec![build_collection(features)]
}
