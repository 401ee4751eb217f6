//! # Storage Traits
//!
//! Storage abstraction used by the domain services. Repositories return
//! `anyhow::Result`; the services wrap failures as persistence errors.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::child::{Child, NewChild};
use crate::domain::models::ledger_event::{EventId, InitialBalance, LedgerEvent, NewLedgerEvent};

/// Child rows and their lifecycle
#[async_trait]
pub trait ChildStorage: Send + Sync {
    /// Store a new child, together with its starting balance event if given,
    /// as one unit. Returns the stored child with its assigned id.
    async fn store_child(&self, child: &NewChild, initial: Option<InitialBalance>) -> Result<Child>;

    /// Retrieve a specific child by ID
    async fn get_child(&self, child_id: i64) -> Result<Option<Child>>;

    /// List all children ordered by name, then id
    async fn list_children(&self) -> Result<Vec<Child>>;

    /// Change the weekly amount. Returns false if the child does not exist.
    async fn update_weekly_allowance(&self, child_id: i64, weekly_allowance_cents: i64) -> Result<bool>;

    /// Delete a child and all of its ledger events as one unit.
    /// Returns false if the child does not exist.
    async fn delete_child(&self, child_id: i64) -> Result<bool>;
}

/// The append-only ledger
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Append an event exactly as given
    async fn append(&self, event: &NewLedgerEvent) -> Result<EventId>;

    /// Sum of all event amounts for the child, 0 when there are none
    async fn balance(&self, child_id: i64) -> Result<i64>;

    /// All events for the child, most recent first
    async fn history(&self, child_id: i64) -> Result<Vec<LedgerEvent>>;

    /// Remove every event of the child. Returns the number removed.
    async fn delete_all(&self, child_id: i64) -> Result<u64>;
}

/// Persistence of accrual results
#[async_trait]
pub trait AllowanceStorage: Send + Sync {
    /// Append `events` and move the child's cursor from `expected_cursor` to
    /// `new_cursor` in one transaction.
    ///
    /// Returns false, with nothing written, when the stored cursor no longer
    /// equals `expected_cursor`.
    async fn commit_accrual(
        &self,
        child_id: i64,
        expected_cursor: Option<NaiveDate>,
        new_cursor: NaiveDate,
        events: &[NewLedgerEvent],
    ) -> Result<bool>;
}

/// Factory for the repositories of one storage backend
pub trait Connection: Send + Sync + Clone {
    type ChildRepository: ChildStorage + Clone;
    type LedgerRepository: LedgerStorage + Clone;
    type AllowanceRepository: AllowanceStorage + Clone;

    fn create_child_repository(&self) -> Self::ChildRepository;

    fn create_ledger_repository(&self) -> Self::LedgerRepository;

    fn create_allowance_repository(&self) -> Self::AllowanceRepository;
}
