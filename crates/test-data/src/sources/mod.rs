//! Track sources.
//!
//! - [`ProceduralGenerator`]: random-walk tracks over noise terrain
//! - [`patterns`]: deterministic tracks with known grades

pub mod patterns;
mod procedural;

pub use patterns::{Leg, PatternBuilder};
pub use procedural::{GeneratorError, ProceduralGenerator, apply_dropouts};
