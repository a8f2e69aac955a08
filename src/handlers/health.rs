use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, error};

use crate::models::{ApiError, ErrorResponse, MessageResponse};
use crate::routes::AppState;

/// Welcome message
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Welcome to the Item CRUD Lab API!",
        "Visit /api/docs for interactive documentation",
    ))
}

/// Health check endpoint, verifies the database is reachable
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!("Health check requested");

    match state.store.ping().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(MessageResponse::new("API is healthy!", "Database connection: OK")),
        )),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(ErrorResponse::unavailable(format!("Database connection failed: {}", e)))
        }
    }
}
