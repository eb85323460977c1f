pub mod config;
pub mod errors;
pub mod features;
pub mod file_parsers;
pub mod geometry;
pub mod gradient;
pub mod handlers;
pub mod ingest;
pub mod interpolation;
pub mod request_id;
pub mod segmenter;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

pub use crate::{
    config::{AnchoredConfig, FixedBufferConfig, ProfileConfig, ServerConfig, Strategy},
    features::{FeatureCollection, build_features},
    geometry::GeoPoint,
    gradient::{GradientLevel, GradientPolicy},
};

use crate::{
    handlers::{create_profile, create_profile_from_positions, health_check},
    request_id::request_id_middleware,
};

pub fn create_router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/profiles", post(create_profile))
        .route("/profiles/positions", post(create_profile_from_positions))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!(
        port = config.port,
        max_upload_bytes = config.max_upload_bytes,
        "profile server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
