//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;

use crate::domain::error::DomainError;

/// An error ready to be sent to the client as `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::ChildNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidAmount(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Storage details stay in the log
        let detail = if err.is_client_error() {
            err.to_string()
        } else {
            "Internal server error".to_string()
        };
        Self { status, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}
