use axum::{
    Json,
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// AppError
///
/// Unexpected faults raised while building a response. The detail is logged
/// server-side; the client only ever sees a generic 500 body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to build response header: {0}")]
    Header(#[from] InvalidHeaderValue),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed with an internal fault");

        let body = ErrorResponse {
            success: false,
            error: "Internal server error".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
