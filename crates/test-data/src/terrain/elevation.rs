//! Perlin noise terrain.

use noise::{NoiseFn, Perlin};

use crate::config::{BoundingBox, Region};

/// Terrain height field built from several octaves of Perlin noise.
///
/// The same seed always yields the same surface, so a track generated twice
/// from one seed carries identical altitudes.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    base_elevation: f64,
    /// Amplitude of the relief around the base, in meters.
    relief: f64,
    /// Spatial frequency in cycles per degree.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    pub fn new(seed: u32) -> Self {
        Self::rolling(seed)
    }

    /// High mountains: a valley floor near 1500 m with ±900 m of relief.
    pub fn alpine(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1500.0,
            relief: 900.0,
            frequency: 12.0,
            octaves: 5,
        }
    }

    /// Rolling hills with short steep ramps.
    pub fn rolling(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 350.0,
            relief: 150.0,
            frequency: 40.0,
            octaves: 4,
        }
    }

    /// Almost flat lowland.
    pub fn lowland(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 5.0,
            relief: 4.0,
            frequency: 20.0,
            octaves: 2,
        }
    }

    /// Pick terrain matching a predefined region.
    pub fn for_region(bounds: &BoundingBox, seed: u32) -> Self {
        if *bounds == Region::ALPS {
            Self::alpine(seed)
        } else if *bounds == Region::FLANDERS {
            Self::lowland(seed)
        } else {
            Self::rolling(seed)
        }
    }

    pub fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    pub fn with_relief(mut self, relief: f64) -> Self {
        self.relief = relief;
        self
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    pub fn relief(&self) -> f64 {
        self.relief
    }

    /// Altitude at a coordinate, using fractal Brownian motion over the
    /// octaves. Always within `base ± relief`.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([lat * frequency, lon * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = (total / max_amplitude).clamp(-1.0, 1.0);
        self.base_elevation + normalized * self.relief
    }
}
