//! Synthetic terrain used to give generated tracks their altitudes.

mod elevation;

pub use elevation::ElevationGenerator;
