use shared::{EventKind, HistoryEntry, MoneyRequest, MoneyResponse};

use crate::domain::commands::ledger::{RecordAdjustmentCommand, RecordPurchaseCommand, RecordResult};
use crate::domain::error::DomainResult;
use crate::domain::models::ledger_event::{LedgerEvent, LedgerEventKind};
use crate::domain::money::{from_minor_units, to_minor_units};

/// Mapper between ledger DTOs and domain models
pub struct LedgerMapper;

impl LedgerMapper {
    pub fn to_purchase_command(request: MoneyRequest) -> DomainResult<RecordPurchaseCommand> {
        Ok(RecordPurchaseCommand {
            child_id: request.child_id,
            amount_cents: to_minor_units(request.amount)?,
            note: request.note,
        })
    }

    pub fn to_adjustment_command(request: MoneyRequest) -> DomainResult<RecordAdjustmentCommand> {
        Ok(RecordAdjustmentCommand {
            child_id: request.child_id,
            amount_cents: to_minor_units(request.amount)?,
            note: request.note,
        })
    }

    pub fn to_money_response(result: RecordResult) -> MoneyResponse {
        MoneyResponse {
            ok: true,
            event_id: result.event_id,
            balance: from_minor_units(result.balance_cents),
        }
    }

    pub fn to_history_entry(event: LedgerEvent) -> HistoryEntry {
        HistoryEntry {
            id: event.id,
            timestamp: event.timestamp,
            amount: from_minor_units(event.amount_cents),
            kind: Self::to_dto_kind(event.kind),
            note: event.note,
            period_ending: event.period_ending,
        }
    }

    pub fn to_dto_kind(kind: LedgerEventKind) -> EventKind {
        match kind {
            LedgerEventKind::Initial => EventKind::Initial,
            LedgerEventKind::Purchase => EventKind::Purchase,
            LedgerEventKind::Adjustment => EventKind::Adjustment,
            LedgerEventKind::Allowance => EventKind::Allowance,
        }
    }
}
