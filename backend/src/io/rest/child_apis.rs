//! # REST API for Child Management
//!
//! Endpoints for creating, listing, reading and deleting children, and for
//! reading a child's ledger history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::child_mapper::ChildMapper;
use crate::io::rest::mappers::ledger_mapper::LedgerMapper;
use crate::AppState;
use shared::{ChildSummary, CreateChildRequest, HistoryEntry, OkResponse};

/// List all children with up-to-date balances
pub async fn list_children(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/children");

    let today = state.clock.today();
    match state.allowance_service.accrue_all(today).await {
        Ok(report) if !report.failures.is_empty() => {
            warn!("Listing children with {} failed accruals", report.failures.len());
        }
        Ok(_) => {}
        Err(e) => error!("Failed to run allowance accrual: {}", e),
    }

    match state.child_service.list_accounts().await {
        Ok(accounts) => {
            let children: Vec<ChildSummary> =
                accounts.into_iter().map(ChildMapper::to_summary).collect();
            (StatusCode::OK, Json(children)).into_response()
        }
        Err(e) => {
            error!("Failed to list children: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Create a new child
pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    let result = match ChildMapper::to_create_command(request) {
        Ok(command) => state.child_service.create_child(command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(account) => (StatusCode::CREATED, Json(ChildMapper::to_summary(account))).into_response(),
        Err(e) => {
            error!("Failed to create child: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Get a child with an up-to-date balance
pub async fn get_child(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    let today = state.clock.today();
    let result = async {
        state.allowance_service.accrue_child(child_id, today).await?;
        state.child_service.get_account(child_id).await
    }
    .await;

    match result {
        Ok(account) => (StatusCode::OK, Json(ChildMapper::to_summary(account))).into_response(),
        Err(e) => {
            error!("Failed to get child {}: {}", child_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Delete a child and its whole ledger
pub async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    match state.child_service.delete_child(child_id).await {
        Ok(()) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(e) => {
            error!("Failed to delete child {}: {}", child_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// A child's ledger events, newest first
pub async fn get_history(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/history", child_id);

    let today = state.clock.today();
    let result = async {
        state.allowance_service.accrue_child(child_id, today).await?;
        state.ledger_service.history(child_id).await
    }
    .await;

    match result {
        Ok(events) => {
            let entries: Vec<HistoryEntry> =
                events.into_iter().map(LedgerMapper::to_history_entry).collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => {
            error!("Failed to get history for child {}: {}", child_id, e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{send, setup_test_app};
    use axum::http::Method;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use shared::{ErrorResponse, EventKind};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_create_child_returns_created_summary() {
        let app = setup_test_app(date(6, 4)).await;

        let (status, child): (_, ChildSummary) = send(
            &app,
            Method::POST,
            "/api/children",
            Some(json!({"name": " Ada ", "weekly_allowance": 5, "starting_balance": 12.5})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(child.name, "Ada");
        assert_eq!(child.weekly_allowance, dec!(5));
        assert_eq!(child.balance, dec!(12.5));
        assert_eq!(child.allowance_start_date, date(6, 4));
        assert_eq!(child.last_allowance_applied, None);
    }

    #[tokio::test]
    async fn test_create_child_with_empty_name_is_bad_request() {
        let app = setup_test_app(date(6, 4)).await;

        let (status, body): (_, ErrorResponse) = send(
            &app,
            Method::POST,
            "/api/children",
            Some(json!({"name": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "Child name cannot be empty");
    }

    #[tokio::test]
    async fn test_create_child_with_huge_allowance_is_bad_request() {
        let app = setup_test_app(date(6, 4)).await;

        let (status, body): (_, ErrorResponse) = send(
            &app,
            Method::POST,
            "/api/children",
            Some(json!({"name": "Ada", "weekly_allowance": 5e16})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.contains("out of range"));

        let (_, children): (_, Vec<ChildSummary>) =
            send(&app, Method::GET, "/api/children", None).await;
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_reads_apply_due_allowance() {
        // Child anchored on a Wednesday, read 22 days later
        let app = setup_test_app(date(6, 26)).await;
        let (_, child): (_, ChildSummary) = send(
            &app,
            Method::POST,
            "/api/children",
            Some(json!({"name": "Ada", "weekly_allowance": 5, "allowance_start_date": "2025-06-04"})),
        )
        .await;

        let uri = format!("/api/children/{}", child.id);
        let (status, summary): (_, ChildSummary) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary.balance, dec!(15));
        assert_eq!(summary.last_allowance_applied, Some(date(6, 22)));

        let (_, again): (_, ChildSummary) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(again.balance, dec!(15));

        let (status, history): (_, Vec<HistoryEntry>) =
            send(&app, Method::GET, &format!("{}/history", uri), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|e| e.kind == EventKind::Allowance));
        let mut periods: Vec<NaiveDate> = history.iter().filter_map(|e| e.period_ending).collect();
        periods.sort();
        assert_eq!(periods, vec![date(6, 8), date(6, 15), date(6, 22)]);
    }

    #[tokio::test]
    async fn test_list_children_ordered_by_name() {
        let app = setup_test_app(date(6, 15)).await;
        for (name, weekly) in [("Max", 0), ("Ada", 2)] {
            let _: (_, Value) = send(
                &app,
                Method::POST,
                "/api/children",
                Some(json!({"name": name, "weekly_allowance": weekly, "allowance_start_date": "2025-06-04"})),
            )
            .await;
        }

        let (status, children): (_, Vec<ChildSummary>) =
            send(&app, Method::GET, "/api/children", None).await;

        assert_eq!(status, StatusCode::OK);
        let summary: Vec<(String, rust_decimal::Decimal)> =
            children.into_iter().map(|c| (c.name, c.balance)).collect();
        assert_eq!(summary, vec![("Ada".to_string(), dec!(4)), ("Max".to_string(), dec!(0))]);
    }

    #[tokio::test]
    async fn test_missing_child_is_not_found() {
        let app = setup_test_app(date(6, 4)).await;

        for (method, uri) in [
            (Method::GET, "/api/children/41"),
            (Method::GET, "/api/children/41/history"),
            (Method::DELETE, "/api/children/41"),
        ] {
            let (status, body): (_, ErrorResponse) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.detail, "Child not found: 41");
        }
    }

    #[tokio::test]
    async fn test_delete_child() {
        let app = setup_test_app(date(6, 4)).await;
        let (_, child): (_, ChildSummary) = send(
            &app,
            Method::POST,
            "/api/children",
            Some(json!({"name": "Ada", "starting_balance": 10})),
        )
        .await;
        let uri = format!("/api/children/{}", child.id);

        let (status, body): (_, OkResponse) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ok);

        let (status, _): (_, ErrorResponse) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
