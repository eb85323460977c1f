//! Raw GeoJSON position handling.
//!
//! Positions follow the GeoJSON convention `[longitude, latitude]` or
//! `[longitude, latitude, altitude]`. Anything else is not a point.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GeoPoint;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("position must have 2 or 3 elements, got {0}")]
pub struct InvalidPosition(pub usize);

/// A `[lon, lat]` or `[lon, lat, alt]` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
}

impl From<&GeoPoint> for Position {
    fn from(point: &GeoPoint) -> Self {
        Self {
            longitude: point.longitude,
            latitude: point.latitude,
            altitude: point.altitude,
        }
    }
}

impl From<Position> for GeoPoint {
    fn from(position: Position) -> Self {
        GeoPoint::new(position.latitude, position.longitude, position.altitude)
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        match position.altitude {
            Some(altitude) => vec![position.longitude, position.latitude, altitude],
            None => vec![position.longitude, position.latitude],
        }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = InvalidPosition;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        GeoPoint::from_position(&values)
            .map(|point| Position::from(&point))
            .ok_or(InvalidPosition(values.len()))
    }
}

impl GeoPoint {
    /// Read a `[lon, lat]` or `[lon, lat, alt]` position.
    pub fn from_position(values: &[f64]) -> Option<GeoPoint> {
        match *values {
            [longitude, latitude] => Some(GeoPoint::new(latitude, longitude, None)),
            [longitude, latitude, altitude] => {
                Some(GeoPoint::new(latitude, longitude, Some(altitude)))
            }
            _ => None,
        }
    }
}

/// Convert raw positions into points, skipping malformed entries.
pub fn points_from_positions<P: AsRef<[f64]>>(positions: &[P]) -> Vec<GeoPoint> {
    positions
        .iter()
        .enumerate()
        .filter_map(|(index, values)| {
            let values = values.as_ref();
            let point = GeoPoint::from_position(values);
            if point.is_none() {
                tracing::debug!(index, len = values.len(), "skipping malformed position");
            }
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_position() {
        assert_eq!(
            GeoPoint::from_position(&[6.5, 45.2]),
            Some(GeoPoint::new(45.2, 6.5, None))
        );
        assert_eq!(
            GeoPoint::from_position(&[6.5, 45.2, 1234.0]),
            Some(GeoPoint::new(45.2, 6.5, Some(1234.0)))
        );
        assert_eq!(GeoPoint::from_position(&[6.5]), None);
        assert_eq!(GeoPoint::from_position(&[1.0, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn test_malformed_positions_are_skipped() {
        let positions = vec![
            vec![6.0, 45.0, 100.0],
            vec![6.1],
            vec![6.2, 45.2],
            vec![],
            vec![6.3, 45.3, 1.0, 2.0],
        ];
        let points = points_from_positions(&positions);
        assert_eq!(
            points,
            vec![
                GeoPoint::new(45.0, 6.0, Some(100.0)),
                GeoPoint::new(45.2, 6.2, None),
            ]
        );
    }

    #[test]
    fn test_position_deserialization_rejects_bad_arity() {
        let ok: Position = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(ok.altitude, Some(3.0));
        assert!(serde_json::from_str::<Position>("[1.0]").is_err());
    }
}
