//! # REST API for Weekly Allowance
//!
//! Manual accrual runs and changes to a child's weekly amount.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::domain::money::to_minor_units;
use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::allowance_mapper::AllowanceMapper;
use crate::io::rest::mappers::child_mapper::ChildMapper;
use crate::AppState;
use shared::UpdateAllowanceRequest;

/// Credit every due period for every child
pub async fn run_allowance(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/allowance/run");

    match state.allowance_service.accrue_all(state.clock.today()).await {
        Ok(report) => (StatusCode::OK, Json(AllowanceMapper::to_run_response(report))).into_response(),
        Err(e) => {
            error!("Failed to run allowance: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Change a child's weekly amount. Periods already due are credited at the
/// old amount first.
pub async fn update_weekly_allowance(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
    Json(request): Json<UpdateAllowanceRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{}/allowance - request: {:?}", child_id, request);

    let today = state.clock.today();
    let result = async {
        let weekly_allowance_cents = to_minor_units(request.weekly_allowance)?;
        state.allowance_service.accrue_child(child_id, today).await?;
        state
            .allowance_service
            .update_weekly_amount(child_id, weekly_allowance_cents)
            .await?;
        state.child_service.get_account(child_id).await
    }
    .await;

    match result {
        Ok(account) => (StatusCode::OK, Json(ChildMapper::to_summary(account))).into_response(),
        Err(e) => {
            error!("Failed to update allowance for child {}: {}", child_id, e);
            ApiError::from(e).into_response()
        }
    }
}
