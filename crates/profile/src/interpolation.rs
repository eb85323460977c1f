//! Altitude interpolation for points that lack it.
//!
//! The chart cannot plot a point without an altitude. When interpolation is
//! requested, leading and trailing gaps are filled flat from the nearest known
//! altitude, and inner gaps are filled along the constant grade between the
//! two altitude-bearing points that bound them.

use std::borrow::Cow;

use crate::geometry::{GeoPoint, cumulative_distance, distance};

/// Return the points with missing altitudes filled in, or the input unchanged
/// when `interpolate` is false.
///
/// The input is never modified; filled points are new values. A list where no
/// point has an altitude comes back unchanged.
pub fn interpolate_elevation(points: &[GeoPoint], interpolate: bool) -> Cow<'_, [GeoPoint]> {
    if !interpolate || points.iter().all(GeoPoint::has_altitude) {
        return Cow::Borrowed(points);
    }

    let mut result = points.to_vec();
    fill_start(&mut result);
    fill_end(&mut result);

    let mut previous: Option<usize> = None;
    let mut i = 0;
    while i < result.len() {
        if result[i].has_altitude() {
            previous = Some(i);
            i += 1;
            continue;
        }

        // only reachable when nothing in the list has an altitude
        let Some(prev) = previous else {
            i += 1;
            continue;
        };
        let Some(next) = (i + 1..result.len()).find(|&j| result[j].has_altitude()) else {
            i += 1;
            continue;
        };

        fill_gap(&mut result, prev, next);
        i = next;
    }

    Cow::Owned(result)
}

fn fill_start(points: &mut [GeoPoint]) {
    let Some(first) = points.iter().position(GeoPoint::has_altitude) else {
        return;
    };
    let Some(altitude) = points[first].altitude else {
        return;
    };
    for point in &mut points[..first] {
        *point = point.with_altitude(altitude);
    }
}

fn fill_end(points: &mut [GeoPoint]) {
    let Some(last) = points.iter().rposition(GeoPoint::has_altitude) else {
        return;
    };
    let Some(altitude) = points[last].altitude else {
        return;
    };
    for point in &mut points[last + 1..] {
        *point = point.with_altitude(altitude);
    }
}

/// Fill `prev + 1..next` so that the grade from `prev` to `next` is constant.
///
/// The grade is computed once over the whole bounded run and applied step by
/// step, each point building on the rounded altitude of the one before it.
fn fill_gap(points: &mut [GeoPoint], prev: usize, next: usize) {
    let (Some(start_alt), Some(end_alt)) = (points[prev].altitude, points[next].altitude) else {
        return;
    };

    let run = cumulative_distance(&points[prev..=next]);
    let grade = if run == 0.0 {
        0.0
    } else {
        (end_alt - start_alt) * 100.0 / run
    };

    for i in prev + 1..next {
        let step = distance(&points[i - 1], &points[i]);
        let base = points[i - 1].altitude.unwrap_or(start_alt);
        let altitude = round_to_decimeter(base + grade * step / 100.0);
        points[i] = points[i].with_altitude(altitude);
    }
}

fn round_to_decimeter(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
