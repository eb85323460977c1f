//! HTTP request handlers for the profile API.

use axum::{
    extract::{Multipart, Query},
    response::Json,
};
use bytes::{Bytes, BytesMut};
use serde::Deserialize;

use crate::{
    config::{AnchoredConfig, FixedBufferConfig, ProfileConfig, Strategy},
    errors::AppError,
    features::{FeatureCollection, build_features},
    file_parsers::{FileType, ParseError, parse_track_file},
    gradient::GradientPolicy,
    ingest::points_from_positions,
};

pub async fn health_check() -> &'static str {
    "ok"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    FixedBuffer,
    Anchored,
}

/// Profile options carried flat in the query string of an upload.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub strategy: Option<StrategyKind>,
    pub policy: Option<GradientPolicy>,
    pub interpolate: Option<bool>,
    // anchored
    pub normalize: Option<bool>,
    pub chart_width: Option<f64>,
    pub min_width: Option<f64>,
    // fixed buffer
    pub segment_count: Option<u32>,
    pub min_segment_distance: Option<f64>,
}

impl ProfileQuery {
    pub fn into_config(self) -> ProfileConfig {
        let strategy = match self.strategy.unwrap_or(StrategyKind::Anchored) {
            StrategyKind::FixedBuffer => {
                let defaults = FixedBufferConfig::default();
                Strategy::FixedBuffer(FixedBufferConfig {
                    segment_count: self.segment_count.unwrap_or(defaults.segment_count),
                    min_segment_distance_meters: self
                        .min_segment_distance
                        .unwrap_or(defaults.min_segment_distance_meters),
                    policy: self.policy.unwrap_or(defaults.policy),
                })
            }
            StrategyKind::Anchored => {
                let defaults = AnchoredConfig::default();
                Strategy::Anchored(AnchoredConfig {
                    normalize: self.normalize.unwrap_or(defaults.normalize),
                    chart_width_pixels: self.chart_width.unwrap_or(defaults.chart_width_pixels),
                    min_normalization_width_pixels: self
                        .min_width
                        .unwrap_or(defaults.min_normalization_width_pixels),
                    policy: self.policy.unwrap_or(defaults.policy),
                })
            }
        };

        ProfileConfig {
            interpolate_elevation: self.interpolate.unwrap_or(false),
            strategy,
        }
    }
}

/// Build a gradient profile from an uploaded GPX, TCX, or FIT file.
///
/// The format comes from the file name's extension when it has one, and from
/// the file contents otherwise.
pub async fn create_profile(
    Query(params): Query<ProfileQuery>,
    mut multipart: Multipart,
) -> Result<Json<Vec<FeatureCollection>>, AppError> {
    let mut file_name: Option<String> = None;
    let mut file_bytes = BytesMut::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::InvalidInput("Failed to process multipart data".to_string()))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(str::to_string);
            let chunk = field
                .bytes()
                .await
                .map_err(|_| AppError::InvalidInput("Failed to read file data".to_string()))?;
            file_bytes.extend(chunk);
        } else {
            tracing::warn!("Unexpected field: {:?}", field.name());
        }
    }

    if file_bytes.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }
    let file_bytes = file_bytes.freeze();

    let file_type = resolve_file_type(file_name.as_deref(), &file_bytes)?;
    tracing::info!(?file_type, ?file_name, bytes = file_bytes.len(), "profiling upload");

    let points = parse_track_file(file_type, file_bytes)?;
    let config = params.into_config();

    Ok(Json(build_features(&points, &config)))
}

fn resolve_file_type(file_name: Option<&str>, bytes: &Bytes) -> Result<FileType, ParseError> {
    match file_name {
        Some(name) if name.contains('.') => FileType::from_file_name(name),
        _ => FileType::detect_from_bytes(bytes).ok_or(ParseError::UnrecognizedContents),
    }
}

#[derive(Debug, Deserialize)]
pub struct PositionsRequest {
    pub coordinates: Vec<Vec<f64>>,
    #[serde(default)]
    pub config: ProfileConfig,
}

/// Build a gradient profile from raw `[lon, lat, alt?]` positions.
pub async fn create_profile_from_positions(
    Json(request): Json<PositionsRequest>,
) -> Json<Vec<FeatureCollection>> {
    let points = points_from_positions(&request.coordinates);
    tracing::info!(
        received = request.coordinates.len(),
        accepted = points.len(),
        "profiling positions"
    );

    Json(build_features(&points, &request.config))
}
