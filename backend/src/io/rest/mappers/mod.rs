//! Conversions between the `shared` DTOs and domain types.
//!
//! Decimal money is turned into minor units here and nowhere else.

pub mod allowance_mapper;
pub mod child_mapper;
pub mod ledger_mapper;
