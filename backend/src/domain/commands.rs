//! Domain-level command types.
//!
//! The REST layer maps the public DTOs from the `shared` crate to these,
//! converting decimal money to minor units on the way in.

pub mod child {
    use chrono::NaiveDate;

    /// Input for creating a new child.
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub weekly_allowance_cents: i64,
        pub starting_balance_cents: i64,
        /// Defaults to today when absent
        pub allowance_start_date: Option<NaiveDate>,
    }
}

pub mod ledger {
    /// Input for recording a purchase. The amount is the positive price;
    /// it is stored as a negative event.
    #[derive(Debug, Clone)]
    pub struct RecordPurchaseCommand {
        pub child_id: i64,
        pub amount_cents: i64,
        pub note: Option<String>,
    }

    /// Input for a manual correction in either direction.
    #[derive(Debug, Clone)]
    pub struct RecordAdjustmentCommand {
        pub child_id: i64,
        pub amount_cents: i64,
        pub note: Option<String>,
    }

    /// Result of recording a purchase or adjustment.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordResult {
        pub event_id: i64,
        pub balance_cents: i64,
    }
}

pub mod allowance {
    /// Outcome of running accrual for one child.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChildAccrual {
        pub child_id: i64,
        pub credited_periods: u32,
    }

    /// Outcome of a catch-up across all children.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AccrualReport {
        pub accruals: Vec<ChildAccrual>,
        /// Children whose catch-up failed, with the error message
        pub failures: Vec<(i64, String)>,
    }

    impl AccrualReport {
        pub fn credited_periods(&self) -> u32 {
            self.accruals.iter().map(|a| a.credited_periods).sum()
        }

        pub fn failed_child_ids(&self) -> Vec<i64> {
            self.failures.iter().map(|(id, _)| *id).collect()
        }
    }
}
