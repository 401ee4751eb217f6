use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::AppState;
use shared::{ErrorResponse, HealthResponse};

/// Liveness check that also verifies the database answers
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/health");

    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    detail: "Database unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}
