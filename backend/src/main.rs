use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::{info, warn};

use allowance_ledger::config::{init_logging, Settings};
use allowance_ledger::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings);

    let app_state = initialize_backend(&settings).await?;

    // Catch up on allowance missed while the service was down
    let report = app_state
        .allowance_service
        .accrue_all(app_state.clock.today())
        .await?;
    info!(
        "Startup accrual credited {} periods across {} children",
        report.credited_periods(),
        report.accruals.len()
    );
    if !report.failures.is_empty() {
        warn!("Startup accrual failed for children {:?}", report.failed_child_ids());
    }

    let app = create_router(app_state, settings.allowed_origin.as_deref())?;

    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", settings.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
