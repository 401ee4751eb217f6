//! # REST API for Purchases and Adjustments
//!
//! Both endpoints credit due allowance before recording, so the returned
//! balance matches what a following read reports.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::ledger_mapper::LedgerMapper;
use crate::AppState;
use shared::MoneyRequest;

/// Record a purchase; `amount` is the positive price
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(request): Json<MoneyRequest>,
) -> impl IntoResponse {
    info!("POST /api/purchase - request: {:?}", request);

    let today = state.clock.today();
    let result = async {
        let command = LedgerMapper::to_purchase_command(request)?;
        state.allowance_service.accrue_child(command.child_id, today).await?;
        state.ledger_service.record_purchase(command).await
    }
    .await;

    match result {
        Ok(recorded) => (StatusCode::CREATED, Json(LedgerMapper::to_money_response(recorded))).into_response(),
        Err(e) => {
            error!("Failed to record purchase: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Record a manual adjustment in either direction
pub async fn record_adjustment(
    State(state): State<AppState>,
    Json(request): Json<MoneyRequest>,
) -> impl IntoResponse {
    info!("POST /api/adjust - request: {:?}", request);

    let today = state.clock.today();
    let result = async {
        let command = LedgerMapper::to_adjustment_command(request)?;
        state.allowance_service.accrue_child(command.child_id, today).await?;
        state.ledger_service.record_adjustment(command).await
    }
    .await;

    match result {
        Ok(recorded) => (StatusCode::CREATED, Json(LedgerMapper::to_money_response(recorded))).into_response(),
        Err(e) => {
            error!("Failed to record adjustment: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
