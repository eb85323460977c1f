//! Track points and the distance primitives the rest of the engine is built on.

use geo::{Distance as _, Haversine, geometry::Point};
use serde::{Deserialize, Serialize};

/// A single track point. Altitude is optional; a missing altitude is `None`,
/// never a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64, altitude: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub const fn with_altitude(self, altitude: f64) -> Self {
        Self {
            altitude: Some(altitude),
            ..self
        }
    }

    pub fn has_altitude(&self) -> bool {
        self.altitude.is_some()
    }

    /// The point as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Great-circle distance in meters between two points.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Haversine.distance(a.point(), b.point())
}

/// Sum of the distances between consecutive points, in meters.
pub fn cumulative_distance(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_one_degree_latitude() {
        // Known distance: ~111km for 1 degree of latitude
        let a = GeoPoint::new(0.0, 0.0, None);
        let b = GeoPoint::new(1.0, 0.0, None);
        assert!((distance(&a, &b) - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(45.8326, 6.8652, Some(4808.0));
        let b = GeoPoint::new(45.9237, 6.8694, Some(1035.0));
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert!(distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_identical_points_have_zero_distance() {
        let a = GeoPoint::new(40.015, -105.2705, None);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_cumulative_distance() {
        assert_eq!(cumulative_distance(&[]), 0.0);
        assert_eq!(cumulative_distance(&[GeoPoint::new(1.0, 1.0, None)]), 0.0);

        let points = [
            GeoPoint::new(0.0, 0.0, None),
            GeoPoint::new(0.001, 0.0, None),
            GeoPoint::new(0.002, 0.0, None),
        ];
        let total = cumulative_distance(&points);
        let direct = distance(&points[0], &points[2]);
        assert!((total - direct).abs() < 1e-6);
    }

    #[test]
    fn test_with_altitude_returns_new_value() {
        let original = GeoPoint::new(1.0, 2.0, None);
        let filled = original.with_altitude(12.5);
        assert_eq!(original.altitude, None);
        assert_eq!(filled.altitude, Some(12.5));
        assert_eq!(filled.latitude, 1.0);
        assert_eq!(filled.longitude, 2.0);
    }
}
