//! Ledger service for the allowance tracker.
//!
//! Wraps the append-only ledger with the rules the store itself does not
//! enforce: the child must exist, purchases are positive prices stored as
//! negative amounts, adjustments are non-zero.
//!
//! Read contract: [`LedgerService::balance`] and [`LedgerService::history`]
//! reflect only what has been appended. Callers that need allowance credits
//! to be current run `AllowanceService::accrue_child` (or `accrue_all`) for
//! the same date first. Both are idempotent, so doing so on every read is
//! safe.

use std::sync::Arc;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::commands::ledger::{RecordAdjustmentCommand, RecordPurchaseCommand, RecordResult};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::ledger_event::{EventId, LedgerEvent, LedgerEventKind, NewLedgerEvent};
use crate::storage::{ChildStorage, Connection, LedgerStorage};

const MAX_NOTE_LENGTH: usize = 256;
const DEFAULT_ADJUSTMENT_NOTE: &str = "Manual adjustment";

#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    child_repository: C::ChildRepository,
    ledger_repository: C::LedgerRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            ledger_repository: connection.create_ledger_repository(),
            clock,
        }
    }

    /// Append an event of any kind for an existing child. The amount is
    /// stored as given.
    pub async fn append(
        &self,
        child_id: i64,
        amount_cents: i64,
        kind: LedgerEventKind,
        note: Option<String>,
    ) -> DomainResult<EventId> {
        self.ensure_child_exists(child_id).await?;
        let note = Self::clean_note(note)?;

        let event = NewLedgerEvent::new(child_id, amount_cents, kind, note, self.clock.now());
        let event_id = self.ledger_repository.append(&event).await?;

        info!(
            "Appended {} event {} for child {}: {} cents",
            kind, event_id, child_id, amount_cents
        );
        Ok(event_id)
    }

    /// Sum of the child's events in minor units
    pub async fn balance(&self, child_id: i64) -> DomainResult<i64> {
        self.ensure_child_exists(child_id).await?;
        Ok(self.ledger_repository.balance(child_id).await?)
    }

    /// The child's events, most recent first
    pub async fn history(&self, child_id: i64) -> DomainResult<Vec<LedgerEvent>> {
        self.ensure_child_exists(child_id).await?;
        Ok(self.ledger_repository.history(child_id).await?)
    }

    /// Record a purchase. `amount_cents` is the price and must be positive.
    pub async fn record_purchase(&self, command: RecordPurchaseCommand) -> DomainResult<RecordResult> {
        if command.amount_cents <= 0 {
            return Err(DomainError::invalid_amount("Amount must be positive"));
        }

        let event_id = self
            .append(
                command.child_id,
                -command.amount_cents,
                LedgerEventKind::Purchase,
                command.note,
            )
            .await?;

        self.result_for(command.child_id, event_id).await
    }

    /// Record a manual correction. `amount_cents` may be either sign but not
    /// zero.
    pub async fn record_adjustment(
        &self,
        command: RecordAdjustmentCommand,
    ) -> DomainResult<RecordResult> {
        if command.amount_cents == 0 {
            return Err(DomainError::invalid_amount("Amount cannot be zero"));
        }

        let note = command
            .note
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADJUSTMENT_NOTE.to_string());

        let event_id = self
            .append(
                command.child_id,
                command.amount_cents,
                LedgerEventKind::Adjustment,
                Some(note),
            )
            .await?;

        self.result_for(command.child_id, event_id).await
    }

    async fn result_for(&self, child_id: i64, event_id: EventId) -> DomainResult<RecordResult> {
        let balance_cents = self.ledger_repository.balance(child_id).await?;
        Ok(RecordResult {
            event_id,
            balance_cents,
        })
    }

    async fn ensure_child_exists(&self, child_id: i64) -> DomainResult<()> {
        match self.child_repository.get_child(child_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::ChildNotFound(child_id)),
        }
    }

    fn clean_note(note: Option<String>) -> DomainResult<Option<String>> {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(ref n) = note {
            if n.chars().count() > MAX_NOTE_LENGTH {
                return Err(DomainError::validation(format!(
                    "Note cannot exceed {} characters",
                    MAX_NOTE_LENGTH
                )));
            }
        }
        Ok(note)
    }
}
