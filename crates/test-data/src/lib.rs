//! Synthetic GPS tracks for the gradient profile engine.
//!
//! Two kinds of track are available: random walks over Perlin-noise terrain
//! for realistic noisy input, and deterministic patterns built from
//! constant-grade legs for exact expectations.
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let track = PatternBuilder::new(45.0, 6.0)
//!     .flat(1_000.0)
//!     .climb(2_000.0, 8.0)
//!     .build();
//! let gpx = write_gpx(&track, "Col");
//! ```

pub mod config;
pub mod gpx;
pub mod sources;
pub mod terrain;

pub mod prelude {
    pub use crate::config::{BoundingBox, DropoutConfig, Region, TrackConfig};
    pub use crate::gpx::write_gpx;
    pub use crate::sources::patterns::drop_altitudes;
    pub use crate::sources::{
        GeneratorError, Leg, PatternBuilder, ProceduralGenerator, apply_dropouts,
    };
    pub use crate::terrain::ElevationGenerator;
}
