//! Procedural track generation.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use profile::geometry::GeoPoint;

use crate::{
    config::{BoundingBox, DropoutConfig, TrackConfig},
    sources::patterns::METERS_PER_DEGREE,
    terrain::ElevationGenerator,
};

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid jitter: {0}")]
    Jitter(#[from] NormalError),
    #[error("point spacing must be positive, got {0}")]
    Spacing(f64),
}

/// Generates random-walk tracks over noise terrain, with GPS jitter and
/// altitude dropouts.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator {
    config: TrackConfig,
    terrain: ElevationGenerator,
}

impl ProceduralGenerator {
    pub fn new(seed: u32) -> Self {
        let config = TrackConfig::default();
        Self {
            terrain: ElevationGenerator::for_region(&config.bounds, seed),
            config,
        }
    }

    pub fn for_region(bounds: BoundingBox, seed: u32) -> Self {
        Self {
            config: TrackConfig {
                bounds,
                ..Default::default()
            },
            terrain: ElevationGenerator::for_region(&bounds, seed),
        }
    }

    pub fn with_config(mut self, config: TrackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = Some((lat, lon));
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_dropouts(mut self, dropouts: DropoutConfig) -> Self {
        self.config.dropouts = dropouts;
        self
    }

    pub fn with_terrain(mut self, terrain: ElevationGenerator) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Result<Vec<GeoPoint>, GeneratorError> {
        let spacing = self.config.point_spacing_m;
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(GeneratorError::Spacing(self.config.point_spacing_m));
        }

        let start = self
            .config
            .start_point
            .unwrap_or_else(|| self.config.bounds.center());
        let path = self.generate_path(start, rng);

        let position_jitter = Normal::new(0.0, self.config.gps_jitter_m / METERS_PER_DEGREE)?;
        let altitude_jitter = Normal::new(0.0, self.config.elevation_jitter_m)?;

        let mut points: Vec<GeoPoint> = path
            .into_iter()
            .map(|(lat, lon)| {
                let altitude = self.terrain.elevation_at(lat, lon) + altitude_jitter.sample(rng);
                GeoPoint::new(
                    lat + position_jitter.sample(rng),
                    lon + position_jitter.sample(rng),
                    Some(altitude),
                )
            })
            .collect();

        let dropped = apply_dropouts(&mut points, &self.config.dropouts, rng);
        tracing::debug!(
            points = points.len(),
            dropped,
            distance = self.config.distance_meters,
            "generated procedural track"
        );

        Ok(points)
    }

    /// Random walk with momentum, bouncing off the bounds.
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let mut path = vec![start];
        let mut current = start;
        let mut walked = 0.0;
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while walked < self.config.distance_meters {
            heading += rng.gen_range(-0.3..0.3);
            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            let lat = current.0 + step * heading.cos() / METERS_PER_DEGREE;
            let lon = current.1
                + step * heading.sin() / (METERS_PER_DEGREE * current.0.to_radians().cos());

            let (lat, lon, bounced) = self.bounce(lat, lon, heading);
            heading = bounced;
            current = (lat, lon);
            path.push(current);
            walked += step;
        }

        path
    }

    fn bounce(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut heading = heading;

        let lat = if lat < b.min_lat || lat > b.max_lat {
            heading = std::f64::consts::PI - heading;
            lat.clamp(b.min_lat, b.max_lat)
        } else {
            lat
        };
        let lon = if lon < b.min_lon || lon > b.max_lon {
            heading = -heading;
            lon.clamp(b.min_lon, b.max_lon)
        } else {
            lon
        };

        (lat, lon, heading)
    }
}

/// Strip altitudes according to `dropouts`. Returns how many were removed.
pub fn apply_dropouts(
    points: &mut [GeoPoint],
    dropouts: &DropoutConfig,
    rng: &mut impl Rng,
) -> usize {
    let len = points.len();
    let lead = dropouts.missing_lead.min(len);
    let tail_start = len.saturating_sub(dropouts.missing_tail).max(lead);

    for point in &mut points[..lead] {
        point.altitude = None;
    }
    for point in &mut points[tail_start..] {
        point.altitude = None;
    }

    let probability = dropouts.probability.clamp(0.0, 1.0);
    let mut i = lead;
    while i < tail_start {
        if dropouts.max_run > 0 && rng.gen_bool(probability) {
            let run = rng.gen_range(1..=dropouts.max_run);
            let end = (i + run).min(tail_start);
            for point in &mut points[i..end] {
                point.altitude = None;
            }
            i = end;
        } else {
            i += 1;
        }
    }

    points.iter().filter(|p| !p.has_altitude()).count()
}
