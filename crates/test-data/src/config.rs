//! Configuration types for synthetic track generation.

use serde::{Deserialize, Serialize};

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Regions with distinct terrain character.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Western Alps around the Galibier: long climbs, big relief.
    pub const ALPS: BoundingBox = BoundingBox::new(44.9, 6.2, 45.2, 6.6);

    /// Ardennes: short punchy hills.
    pub const ARDENNES: BoundingBox = BoundingBox::new(50.2, 5.6, 50.5, 6.0);

    /// Flanders polders: next to no relief.
    pub const FLANDERS: BoundingBox = BoundingBox::new(51.0, 2.6, 51.3, 3.2);
}

/// How altitude readings go missing on a generated track.
///
/// Devices lose barometric or GPS altitude both as isolated samples and as
/// longer runs, so both are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropoutConfig {
    /// Chance that a point starts a run of missing altitudes.
    pub probability: f64,
    /// Longest run of consecutive missing altitudes.
    pub max_run: usize,
    /// Drop the altitude of every point before the first fix.
    pub missing_lead: usize,
    /// Drop the altitude of the last points.
    pub missing_tail: usize,
}

impl DropoutConfig {
    pub const NONE: DropoutConfig = DropoutConfig {
        probability: 0.0,
        max_run: 0,
        missing_lead: 0,
        missing_tail: 0,
    };
}

impl Default for DropoutConfig {
    fn default() -> Self {
        Self {
            probability: 0.02,
            max_run: 5,
            missing_lead: 0,
            missing_tail: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    /// Starting point (lat, lon). If None, the center of the bounds.
    pub start_point: Option<(f64, f64)>,
    pub bounds: BoundingBox,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// Altitude jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    pub dropouts: DropoutConfig,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 10_000.0,
            start_point: None,
            bounds: Region::ALPS,
            gps_jitter_m: 2.0,
            elevation_jitter_m: 1.5,
            point_spacing_m: 25.0,
            dropouts: DropoutConfig::default(),
        }
    }
}
