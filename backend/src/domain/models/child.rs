//! Domain model for a child and the allowance schedule attached to it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::accrual::AllowanceSchedule;

/// A child as stored. The balance is not part of the row; it is the sum of
/// the child's ledger events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub name: String,
    /// Weekly allowance in minor units, zero disables accrual
    pub weekly_allowance_cents: i64,
    /// Anchor date of the allowance schedule
    pub allowance_start_date: NaiveDate,
    /// Sunday of the most recent credited allowance period
    pub last_allowance_applied: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// The part of the child that drives allowance accrual
    pub fn schedule(&self) -> AllowanceSchedule {
        AllowanceSchedule {
            weekly_amount_cents: self.weekly_allowance_cents,
            start_date: self.allowance_start_date,
            last_applied: self.last_allowance_applied,
        }
    }
}

/// A child that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewChild {
    pub name: String,
    pub weekly_allowance_cents: i64,
    pub allowance_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A child together with its derived balance
#[derive(Debug, Clone, PartialEq)]
pub struct ChildAccount {
    pub child: Child,
    pub balance_cents: i64,
}
