//! # Allowance Ledger Backend
//!
//! Per-child allowance ledger served over HTTP.
//!
//! ```text
//! IO Layer (axum handlers, DTO mappers)
//!     ↓
//! Domain Layer (services, accrual engine)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! Balances are never stored. They are derived from an append-only event log,
//! and weekly allowance credits are posted lazily by the accrual engine at
//! startup and at the start of every balance-reading request.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Settings;
use crate::domain::{AllowanceService, ChildService, Clock, LedgerService, SystemClock};
use crate::storage::DbConnection;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService<DbConnection>,
    pub ledger_service: LedgerService<DbConnection>,
    pub allowance_service: AllowanceService<DbConnection>,
    pub clock: Arc<dyn Clock>,
    pub db: DbConnection,
}

impl AppState {
    pub fn new(db: DbConnection, clock: Arc<dyn Clock>) -> Self {
        let conn = Arc::new(db.clone());
        Self {
            child_service: ChildService::new(conn.clone(), clock.clone()),
            ledger_service: LedgerService::new(conn.clone(), clock.clone()),
            allowance_service: AllowanceService::new(conn, clock.clone()),
            clock,
            db,
        }
    }
}

/// Open the database and build the services
pub async fn initialize_backend(settings: &Settings) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&settings.database_url, settings.max_connections).await?;

    info!("Setting up domain model");
    Ok(AppState::new(db, Arc::new(SystemClock)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: Option<&str>) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match allowed_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    };

    let api_routes = Router::new()
        .route("/health", get(io::health_apis::health))
        .route(
            "/children",
            get(io::child_apis::list_children).post(io::child_apis::create_child),
        )
        .route(
            "/children/:id",
            get(io::child_apis::get_child).delete(io::child_apis::delete_child),
        )
        .route("/children/:id/history", get(io::child_apis::get_history))
        .route(
            "/children/:id/allowance",
            put(io::allowance_apis::update_weekly_allowance),
        )
        .route("/purchase", post(io::money_apis::record_purchase))
        .route("/adjust", post(io::money_apis::record_adjustment))
        .route("/allowance/run", post(io::allowance_apis::run_allowance));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
