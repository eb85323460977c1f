//! Deterministic tracks made of constant-grade legs.
//!
//! Every track runs due north from its start, so the distance between two
//! points is exactly their latitude difference on the mean Earth radius and
//! the grade of every leg is known ahead of time.

use std::{f64::consts::PI, ops::Range};

use profile::geometry::GeoPoint;

/// Meters per degree of latitude on the mean Earth radius.
pub const METERS_PER_DEGREE: f64 = 6_371_008.8 * PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub length_m: f64,
    /// Signed grade in percent; negative goes down.
    pub grade_percent: f64,
}

impl Leg {
    pub const fn new(length_m: f64, grade_percent: f64) -> Self {
        Self {
            length_m,
            grade_percent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternBuilder {
    start: (f64, f64),
    base_altitude: f64,
    spacing_m: f64,
    legs: Vec<Leg>,
}

impl PatternBuilder {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            start: (lat, lon),
            base_altitude: 100.0,
            spacing_m: 100.0,
            legs: Vec::new(),
        }
    }

    pub fn base_altitude(mut self, meters: f64) -> Self {
        self.base_altitude = meters;
        self
    }

    /// Distance between points. Each leg is split into whole steps as close
    /// to this as possible, with half steps rounding up.
    pub fn spacing(mut self, meters: f64) -> Self {
        self.spacing_m = meters;
        self
    }

    pub fn leg(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn flat(self, length_m: f64) -> Self {
        self.leg(Leg::new(length_m, 0.0))
    }

    pub fn climb(self, length_m: f64, grade_percent: f64) -> Self {
        self.leg(Leg::new(length_m, grade_percent.abs()))
    }

    pub fn descent(self, length_m: f64, grade_percent: f64) -> Self {
        self.leg(Leg::new(length_m, -grade_percent.abs()))
    }

    /// Alternate `teeth` climbs and descents of `tooth_length_m` each.
    pub fn sawtooth(mut self, teeth: usize, tooth_length_m: f64, grade_percent: f64) -> Self {
        for _ in 0..teeth {
            self = self
                .climb(tooth_length_m, grade_percent)
                .descent(tooth_length_m, grade_percent);
        }
        self
    }

    /// Index of the first point of every leg, plus the index of the last point.
    pub fn leg_boundaries(&self) -> Vec<usize> {
        let mut boundaries = vec![0];
        let mut index = 0;
        for leg in &self.legs {
            index += self.steps(leg);
            boundaries.push(index);
        }
        boundaries
    }

    fn steps(&self, leg: &Leg) -> usize {
        if self.spacing_m > 0.0 {
            ((leg.length_m / self.spacing_m).round() as usize).max(1)
        } else {
            1
        }
    }

    pub fn build(&self) -> Vec<GeoPoint> {
        let (lat, lon) = self.start;
        let mut offset = 0.0;
        let mut altitude = self.base_altitude;
        let mut points = vec![GeoPoint::new(lat, lon, Some(altitude))];

        for leg in &self.legs {
            let steps = self.steps(leg);
            let step = leg.length_m / steps as f64;
            for _ in 0..steps {
                offset += step;
                altitude += leg.grade_percent / 100.0 * step;
                points.push(GeoPoint::new(
                    lat + offset / METERS_PER_DEGREE,
                    lon,
                    Some(altitude),
                ));
            }
        }

        points
    }
}

/// Remove the altitudes of the points in `range`.
pub fn drop_altitudes(points: &mut [GeoPoint], range: Range<usize>) {
    let end = range.end.min(points.len());
    let start = range.start.min(end);
    for point in &mut points[start..end] {
        point.altitude = None;
    }
}

#[cfg(test)]
mod tests {
    use profile::geometry::{cumulative_distance, distance};

    use super::*;

    #[test]
    fn test_legs_have_their_grade() {
        let builder = PatternBuilder::new(45.0, 6.0)
            .flat(500.0)
            .climb(1000.0, 8.0)
            .descent(400.0, 5.0);
        let points = builder.build();

        assert_eq!(builder.leg_boundaries(), vec![0, 5, 15, 19]);
        assert_eq!(points.len(), 20);
        assert!((cumulative_distance(&points) - 1900.0).abs() < 1e-6);

        let (a, b) = (&points[5], &points[15]);
        let grade = (b.altitude.unwrap() - a.altitude.unwrap()) * 100.0 / cumulative_distance(&points[5..=15]);
        assert!((grade - 8.0).abs() < 1e-6);
        assert!((points[19].altitude.unwrap() - 160.0).abs() < 1e-6);
    }

    #[test]
    fn test_uneven_leg_length_is_split_evenly() {
        let points = PatternBuilder::new(45.0, 6.0).spacing(100.0).flat(240.0).build();
        assert_eq!(points.len(), 3);
        assert!((distance(&points[0], &points[1]) - 120.0).abs() < 1e-6);

        // half steps round up
        let points = PatternBuilder::new(45.0, 6.0).spacing(100.0).flat(250.0).build();
        assert_eq!(points.len(), 4);
        assert!((distance(&points[0], &points[1]) - 250.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sawtooth() {
        let builder = PatternBuilder::new(45.0, 6.0).sawtooth(3, 200.0, 10.0);
        let points = builder.build();
        assert_eq!(points.len(), 13);
        for point in points.iter().step_by(4) {
            assert!((point.altitude.unwrap() - 100.0).abs() < 1e-9);
        }
        assert!((points[2].altitude.unwrap() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_altitudes_clamps_range() {
        let mut points = PatternBuilder::new(45.0, 6.0).flat(300.0).build();
        drop_altitudes(&mut points, 2..10);
        assert_eq!(points[1].altitude, Some(100.0));
        assert_eq!(points[2].altitude, None);
        assert_eq!(points[3].altitude, None);
    }
}
