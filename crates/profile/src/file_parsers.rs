//! Track file parsers for GPX, TCX, and FIT formats.
//!
//! Every format is reduced to the same ordered list of [`GeoPoint`]s; points
//! without a position are dropped, points without an altitude are kept.

use std::io::BufReader;

use bytes::{Buf as _, Bytes};

use crate::geometry::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Gpx,
    Tcx,
    Fit,
}

impl FileType {
    /// Map a file extension (with or without the leading dot) to a format.
    pub fn from_extension(extension: &str) -> Result<Self, ParseError> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "gpx" => Ok(FileType::Gpx),
            "tcx" => Ok(FileType::Tcx),
            "fit" => Ok(FileType::Fit),
            _ => Err(ParseError::UnknownExtension(extension.to_string())),
        }
    }

    /// Map a file name to a format by its extension.
    pub fn from_file_name(name: &str) -> Result<Self, ParseError> {
        match name.rsplit_once('.') {
            Some((_, extension)) => Self::from_extension(extension),
            None => Err(ParseError::UnknownExtension(name.to_string())),
        }
    }

    /// Sniff the format from the file contents.
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        // FIT files carry ".FIT" at offset 8 of the header
        if bytes.len() >= 12 && &bytes[8..12] == b".FIT" {
            return Some(FileType::Fit);
        }

        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
        if head.contains("<TrainingCenterDatabase") {
            Some(FileType::Tcx)
        } else if head.contains("<gpx") {
            Some(FileType::Gpx)
        } else {
            None
        }
    }
}

/// Error type for parsing failures
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown extension '{0}'")]
    UnknownExtension(String),
    #[error("Unrecognized file contents")]
    UnrecognizedContents,
    #[error("Failed to parse GPX file: {0}")]
    GpxError(String),
    #[error("Failed to parse TCX file: {0}")]
    TcxError(String),
    #[error("Failed to parse FIT file: {0}")]
    FitError(String),
    #[error("No track points found")]
    NoTrackPoints,
}

/// Parse a track file of the given type into points.
pub fn parse_track_file(file_type: FileType, bytes: Bytes) -> Result<Vec<GeoPoint>, ParseError> {
    let points = match file_type {
        FileType::Gpx => parse_gpx(bytes)?,
        FileType::Tcx => parse_tcx(bytes)?,
        FileType::Fit => parse_fit(bytes)?,
    };

    if points.is_empty() {
        return Err(ParseError::NoTrackPoints);
    }

    tracing::debug!(?file_type, points = points.len(), "parsed track file");
    Ok(points)
}

/// Parse a GPX file. Track points come first, then route points.
pub fn parse_gpx(bytes: Bytes) -> Result<Vec<GeoPoint>, ParseError> {
    let gpx = gpx::read(bytes.reader()).map_err(|e| ParseError::GpxError(e.to_string()))?;

    let track_points = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points);
    let route_points = gpx.routes.iter().flat_map(|route| &route.points);

    Ok(track_points
        .chain(route_points)
        .map(|pt| {
            let point = pt.point();
            GeoPoint::new(point.y(), point.x(), pt.elevation)
        })
        .collect())
}

/// Parse a TCX (Training Center XML) file.
pub fn parse_tcx(bytes: Bytes) -> Result<Vec<GeoPoint>, ParseError> {
    // TCX crate needs a BufReader
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut buf_reader = BufReader::new(cursor);

    let tcx_data =
        tcx::read(&mut buf_reader).map_err(|e| ParseError::TcxError(format!("{e:?}")))?;

    let mut points = Vec::new();

    if let Some(ref activities) = tcx_data.activities {
        for activity in &activities.activities {
            for lap in &activity.laps {
                for track in &lap.tracks {
                    for trackpoint in &track.trackpoints {
                        let Some(ref position) = trackpoint.position else {
                            continue;
                        };

                        points.push(GeoPoint::new(
                            position.latitude,
                            position.longitude,
                            trackpoint.altitude_meters,
                        ));
                    }
                }
            }
        }
    }

    Ok(points)
}

/// Parse a FIT (Flexible and Interoperable Data Transfer) file.
pub fn parse_fit(bytes: Bytes) -> Result<Vec<GeoPoint>, ParseError> {
    let data = bytes.to_vec();
    let fit_data = fitparser::from_bytes(&data).map_err(|e| ParseError::FitError(e.to_string()))?;

    let mut points = Vec::new();

    for record in fit_data {
        // "record" messages hold the per-second samples
        if record.kind() != fitparser::profile::field_types::MesgNum::Record {
            continue;
        }

        let mut lat: Option<f64> = None;
        let mut lon: Option<f64> = None;
        let mut altitude: Option<f64> = None;

        for field in record.fields() {
            match field.name() {
                "position_lat" => {
                    if let fitparser::Value::SInt32(v) = field.value() {
                        lat = Some(semicircles_to_degrees(*v));
                    }
                }
                "position_long" => {
                    if let fitparser::Value::SInt32(v) = field.value() {
                        lon = Some(semicircles_to_degrees(*v));
                    }
                }
                "enhanced_altitude" => {
                    altitude = extract_fit_f64(field.value()).or(altitude);
                }
                "altitude" => {
                    altitude = altitude.or_else(|| extract_fit_f64(field.value()));
                }
                _ => {}
            }
        }

        if let (Some(lat), Some(lon)) = (lat, lon) {
            points.push(GeoPoint::new(lat, lon, altitude));
        }
    }

    Ok(points)
}

/// Convert FIT semicircles to degrees.
/// FIT uses semicircles where 2^31 semicircles = 180 degrees.
fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}

fn extract_fit_f64(value: &fitparser::Value) -> Option<f64> {
    match value {
        fitparser::Value::Float32(v) => Some(*v as f64),
        fitparser::Value::Float64(v) => Some(*v),
        fitparser::Value::SInt8(v) => Some(*v as f64),
        fitparser::Value::UInt8(v) => Some(*v as f64),
        fitparser::Value::SInt16(v) => Some(*v as f64),
        fitparser::Value::UInt16(v) => Some(*v as f64),
        fitparser::Value::SInt32(v) => Some(*v as f64),
        fitparser::Value::UInt32(v) => Some(*v as f64),
        _ => None,
    }
}
