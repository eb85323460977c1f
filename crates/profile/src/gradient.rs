//! Grade computation and the mapping of grades onto discrete gradient levels.
//!
//! A grade is rise over run as a percentage. The chart colors each feature by
//! its gradient level, so the mapping must be total: every finite grade lands
//! in exactly one level under the active [`GradientPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::ClassifyError,
    geometry::{GeoPoint, cumulative_distance},
};

/// Discrete gradient bucket carried as `attributeType` on every feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradientLevel(i8);

impl GradientLevel {
    pub const FLAT: GradientLevel = GradientLevel(0);

    pub const fn new(level: i8) -> Self {
        Self(level)
    }

    pub const fn value(self) -> i8 {
        self.0
    }
}

impl fmt::Display for GradientLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How percentages are bucketed. A single run never mixes policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPolicy {
    /// Eleven bands, -5..=5, with thresholds at ±1, ±4, ±7, ±10 and ±16 percent.
    Banded,
    /// One level per whole percent, clamped to -16..=16.
    #[default]
    Linear,
}

impl GradientPolicy {
    pub const LINEAR_LIMIT: i8 = 16;

    pub fn classify(self, percentage: f64) -> Result<GradientLevel, ClassifyError> {
        match self {
            GradientPolicy::Banded => classify_banded(percentage),
            GradientPolicy::Linear => classify_linear(percentage),
        }
    }
}

fn classify_banded(p: f64) -> Result<GradientLevel, ClassifyError> {
    let level = if p <= -16.0 {
        -5
    } else if p > -16.0 && p <= -10.0 {
        -4
    } else if p > -10.0 && p <= -7.0 {
        -3
    } else if p > -7.0 && p <= -4.0 {
        -2
    } else if p > -4.0 && p <= -1.0 {
        -1
    } else if p > -1.0 && p < 1.0 {
        0
    } else if (1.0..4.0).contains(&p) {
        1
    } else if (4.0..7.0).contains(&p) {
        2
    } else if (7.0..10.0).contains(&p) {
        3
    } else if (10.0..16.0).contains(&p) {
        4
    } else if p >= 16.0 {
        5
    } else {
        return Err(ClassifyError::Unclassified(p));
    };
    Ok(GradientLevel(level))
}

fn classify_linear(p: f64) -> Result<GradientLevel, ClassifyError> {
    if p.is_nan() {
        return Err(ClassifyError::Unclassified(p));
    }
    // halves round toward positive infinity
    let rounded = (p + 0.5).floor();
    let limit = f64::from(GradientPolicy::LINEAR_LIMIT);
    Ok(GradientLevel(rounded.clamp(-limit, limit) as i8))
}

/// Classify a grade, falling back to [`GradientLevel::FLAT`] when the policy
/// has no band for it. One bad segment must not block the rest of the chart.
pub fn classify_or_flat(policy: GradientPolicy, percentage: f64) -> GradientLevel {
    policy.classify(percentage).unwrap_or_else(|e| {
        tracing::warn!(?policy, "{e}");
        GradientLevel::FLAT
    })
}

/// Grade in percent between the first and the last altitude-bearing points.
///
/// Distance is measured only over the span between those two points; points
/// outside it carry no altitude and do not count. Fewer than two
/// altitude-bearing points, or a zero-length span, yield 0.
pub fn grade_between(points: &[GeoPoint]) -> f64 {
    let Some(first) = points.iter().position(GeoPoint::has_altitude) else {
        return 0.0;
    };
    let Some(last) = points.iter().rposition(GeoPoint::has_altitude) else {
        return 0.0;
    };
    if last <= first {
        return 0.0;
    }

    let (Some(start_alt), Some(end_alt)) = (points[first].altitude, points[last].altitude) else {
        return 0.0;
    };

    let distance = cumulative_distance(&points[first..=last]);
    if distance == 0.0 {
        0.0
    } else {
        (end_alt - start_alt) * 100.0 / distance
    }
}

/// Gradient level of a point span under the given policy.
pub fn level_between(policy: GradientPolicy, points: &[GeoPoint]) -> GradientLevel {
    classify_or_flat(policy, grade_between(points))
}
