//! Request and response bodies exchanged between the allowance ledger
//! service and its clients.
//!
//! Money is carried as decimal major units (`12.34`). The service converts
//! these to integer minor units as soon as a request arrives and converts back
//! only when building a response.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a ledger event as shown to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Initial,
    Purchase,
    Adjustment,
    Allowance,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Initial => "initial",
            EventKind::Purchase => "purchase",
            EventKind::Adjustment => "adjustment",
            EventKind::Allowance => "allowance",
        };
        f.write_str(s)
    }
}

/// Body of `POST /api/children`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    /// Weekly allowance in major units, zero disables accrual
    #[serde(default)]
    pub weekly_allowance: Decimal,
    /// Seeds an `initial` ledger event when non-zero
    #[serde(default)]
    pub starting_balance: Decimal,
    /// Anchor date for the allowance schedule, defaults to today
    #[serde(default)]
    pub allowance_start_date: Option<NaiveDate>,
}

/// A child together with its derived balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSummary {
    pub id: i64,
    pub name: String,
    pub weekly_allowance: Decimal,
    pub balance: Decimal,
    pub allowance_start_date: NaiveDate,
    /// Sunday of the most recent credited allowance period
    pub last_allowance_applied: Option<NaiveDate>,
}

/// Body of `POST /api/purchase` and `POST /api/adjust`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyRequest {
    pub child_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

/// Returned after a ledger event has been recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyResponse {
    pub ok: bool,
    pub event_id: i64,
    pub balance: Decimal,
}

/// Body of `PUT /api/children/{id}/allowance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAllowanceRequest {
    pub weekly_allowance: Decimal,
}

/// One row of a child's history, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
    pub kind: EventKind,
    pub note: Option<String>,
    /// Sunday of the credited period, allowance events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_ending: Option<NaiveDate>,
}

/// Result of `POST /api/allowance/run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceRunResponse {
    pub ok: bool,
    /// Total number of weekly periods credited across all children
    pub credited_periods: u32,
    /// Children whose catch-up failed and was rolled back
    pub failed_children: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
