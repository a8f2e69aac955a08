use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::FieldError;

/// Error shape returned by every handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Response for an error
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
    /// Field-level problems, only present on validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn with_status(status: StatusCode, error: impl Into<String>) -> ApiError {
        (status, Json(ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: error.into(),
            details: Vec::new(),
        }))
    }

    pub fn not_found(error: impl Into<String>) -> ApiError {
        Self::with_status(StatusCode::NOT_FOUND, error)
    }

    pub fn internal(error: impl Into<String>) -> ApiError {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn unavailable(error: impl Into<String>) -> ApiError {
        Self::with_status(StatusCode::SERVICE_UNAVAILABLE, error)
    }

    pub fn validation(details: Vec<FieldError>) -> ApiError {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        (status, Json(ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: "Validation failed".to_string(),
            details,
        }))
    }
}
