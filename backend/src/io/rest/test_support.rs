//! Helpers for router tests.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::domain::clock::FixedClock;
use crate::storage::DbConnection;
use crate::{create_router, AppState};

/// Router over a fresh in-memory database with the clock pinned to `today`
pub async fn setup_test_app(today: NaiveDate) -> Router {
    let db = DbConnection::init_test().await.expect("Failed to create test database");
    let state = AppState::new(db, Arc::new(FixedClock::on(today)));
    create_router(state, None).expect("Failed to build router")
}

/// Send one request and decode the JSON body
pub async fn send<T: DeserializeOwned>(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, T) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
