use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::file_parsers::ParseError;

/// A grade that none of the policy's bands accept.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ClassifyError {
    #[error("Unknown gradient percentage {0}; cannot map")]
    Unclassified(f64),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Track parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Parse(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        warn!(%status, "{error_message}");

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
