//! Domain models for children and their ledger events.

pub mod child;
pub mod ledger_event;
