use shared::{ChildSummary, CreateChildRequest};

use crate::domain::commands::child::CreateChildCommand;
use crate::domain::error::DomainResult;
use crate::domain::models::child::ChildAccount;
use crate::domain::money::{from_minor_units, to_minor_units};

/// Mapper between child DTOs and domain models
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_create_command(request: CreateChildRequest) -> DomainResult<CreateChildCommand> {
        Ok(CreateChildCommand {
            name: request.name,
            weekly_allowance_cents: to_minor_units(request.weekly_allowance)?,
            starting_balance_cents: to_minor_units(request.starting_balance)?,
            allowance_start_date: request.allowance_start_date,
        })
    }

    pub fn to_summary(account: ChildAccount) -> ChildSummary {
        let ChildAccount {
            child,
            balance_cents,
        } = account;

        ChildSummary {
            id: child.id,
            name: child.name,
            weekly_allowance: from_minor_units(child.weekly_allowance_cents),
            balance: from_minor_units(balance_cents),
            allowance_start_date: child.allowance_start_date,
            last_allowance_applied: child.last_allowance_applied,
        }
    }
}
