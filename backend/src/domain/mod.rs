//! # Domain Module
//!
//! Business rules of the allowance ledger, independent of HTTP.
//!
//! ## Module Organization
//!
//! - **accrual**: pure calculation of the weekly periods due for a child
//! - **allowance_service**: applies accrual plans, edits the weekly amount
//! - **child_service**: child creation, lookup, listing and deletion
//! - **ledger_service**: purchases, adjustments, balance and history reads
//! - **clock**: source of "today" and "now"
//! - **money**: decimal to minor unit conversion at the boundary
//!
//! ## Business Rules
//!
//! - A child's balance is the sum of its ledger events and is never stored
//! - Purchases are positive prices recorded as negative events
//! - Adjustments may be either sign but never zero
//! - Each weekly period is credited at most once per child

pub mod accrual;
pub mod allowance_service;
pub mod child_service;
pub mod clock;
pub mod commands;
pub mod error;
pub mod ledger_service;
pub mod models;
pub mod money;

pub use allowance_service::AllowanceService;
pub use child_service::ChildService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use ledger_service::LedgerService;
