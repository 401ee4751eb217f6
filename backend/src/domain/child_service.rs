use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::commands::child::CreateChildCommand;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::child::{Child, ChildAccount, NewChild};
use crate::domain::models::ledger_event::InitialBalance;
use crate::domain::money::MAX_AMOUNT_CENTS;
use crate::storage::{ChildStorage, Connection, LedgerStorage};

const MAX_NAME_LENGTH: usize = 100;

/// Service for the child lifecycle: creation, lookup, listing and deletion
#[derive(Clone)]
pub struct ChildService<C: Connection> {
    child_repository: C::ChildRepository,
    ledger_repository: C::LedgerRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> ChildService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            ledger_repository: connection.create_ledger_repository(),
            clock,
        }
    }

    /// Create a new child, seeding an `initial` event when the starting
    /// balance is non-zero
    pub async fn create_child(&self, command: CreateChildCommand) -> DomainResult<ChildAccount> {
        info!(
            "Creating child: name={}, weekly_allowance_cents={}, starting_balance_cents={}",
            command.name, command.weekly_allowance_cents, command.starting_balance_cents
        );

        let name = Self::validate_name(&command.name)?;
        if command.weekly_allowance_cents < 0 {
            return Err(DomainError::invalid_amount("Weekly allowance cannot be negative"));
        }
        if command.weekly_allowance_cents > MAX_AMOUNT_CENTS
            || command.starting_balance_cents.unsigned_abs() > MAX_AMOUNT_CENTS.unsigned_abs()
        {
            return Err(DomainError::invalid_amount("Amount is too large"));
        }

        let new_child = NewChild {
            name,
            weekly_allowance_cents: command.weekly_allowance_cents,
            allowance_start_date: command
                .allowance_start_date
                .unwrap_or_else(|| self.clock.today()),
            created_at: self.clock.now(),
        };
        let initial = (command.starting_balance_cents != 0)
            .then(|| InitialBalance::new(command.starting_balance_cents));

        let child = self.child_repository.store_child(&new_child, initial).await?;
        info!("Created child: {} with ID: {}", child.name, child.id);

        Ok(ChildAccount {
            child,
            balance_cents: command.starting_balance_cents,
        })
    }

    /// Get a child by ID
    pub async fn get_child(&self, child_id: i64) -> DomainResult<Child> {
        match self.child_repository.get_child(child_id).await? {
            Some(child) => Ok(child),
            None => {
                warn!("Child not found: {}", child_id);
                Err(DomainError::ChildNotFound(child_id))
            }
        }
    }

    /// A child with its balance. Run accrual first for an up-to-date figure.
    pub async fn get_account(&self, child_id: i64) -> DomainResult<ChildAccount> {
        let child = self.get_child(child_id).await?;
        let balance_cents = self.ledger_repository.balance(child.id).await?;
        Ok(ChildAccount { child, balance_cents })
    }

    /// All children with their balances, ordered by name. Run accrual first
    /// for up-to-date figures.
    pub async fn list_accounts(&self) -> DomainResult<Vec<ChildAccount>> {
        let children = self.child_repository.list_children().await?;
        info!("Found {} children", children.len());

        let mut accounts = Vec::with_capacity(children.len());
        for child in children {
            let balance_cents = self.ledger_repository.balance(child.id).await?;
            accounts.push(ChildAccount { child, balance_cents });
        }
        Ok(accounts)
    }

    /// Delete a child together with all of its ledger events
    pub async fn delete_child(&self, child_id: i64) -> DomainResult<()> {
        info!("Deleting child: {}", child_id);

        if !self.child_repository.delete_child(child_id).await? {
            warn!("Child not found for deletion: {}", child_id);
            return Err(DomainError::ChildNotFound(child_id));
        }

        info!("Deleted child {} and its ledger", child_id);
        Ok(())
    }

    fn validate_name(name: &str) -> DomainResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Child name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Child name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(trimmed.to_string())
    }
}
