//! Domain model for an immutable ledger event.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to an event when it is appended
pub type EventId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    /// Starting balance recorded when the child is created
    Initial,
    Purchase,
    Adjustment,
    Allowance,
}

impl LedgerEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEventKind::Initial => "initial",
            LedgerEventKind::Purchase => "purchase",
            LedgerEventKind::Adjustment => "adjustment",
            LedgerEventKind::Allowance => "allowance",
        }
    }
}

impl fmt::Display for LedgerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerEventKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(LedgerEventKind::Initial),
            "purchase" => Ok(LedgerEventKind::Purchase),
            "adjustment" => Ok(LedgerEventKind::Adjustment),
            "allowance" => Ok(LedgerEventKind::Allowance),
            other => Err(anyhow!("Unknown ledger event kind: {}", other)),
        }
    }
}

/// A stored ledger event. Events are never updated; they are only appended
/// and removed together with their child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: EventId,
    pub child_id: i64,
    /// Signed amount in minor units
    pub amount_cents: i64,
    pub kind: LedgerEventKind,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Sunday of the credited period, set for allowance events only
    pub period_ending: Option<NaiveDate>,
}

/// An event waiting to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEvent {
    pub child_id: i64,
    pub amount_cents: i64,
    pub kind: LedgerEventKind,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub period_ending: Option<NaiveDate>,
}

impl NewLedgerEvent {
    pub fn new(
        child_id: i64,
        amount_cents: i64,
        kind: LedgerEventKind,
        note: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            child_id,
            amount_cents,
            kind,
            note,
            timestamp,
            period_ending: None,
        }
    }

    /// Credit for the weekly period ending on `period_ending`
    pub fn allowance(
        child_id: i64,
        amount_cents: i64,
        period_ending: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            child_id,
            amount_cents,
            kind: LedgerEventKind::Allowance,
            note: Some(Self::allowance_note(period_ending)),
            timestamp,
            period_ending: Some(period_ending),
        }
    }

    pub fn allowance_note(period_ending: NaiveDate) -> String {
        format!("Weekly allowance {}", period_ending.format("%Y-%m-%d"))
    }
}

/// Starting balance recorded as the child's first event
#[derive(Debug, Clone, PartialEq)]
pub struct InitialBalance {
    pub amount_cents: i64,
    pub note: String,
}

impl InitialBalance {
    pub fn new(amount_cents: i64) -> Self {
        Self {
            amount_cents,
            note: "Starting balance".to_string(),
        }
    }
}
