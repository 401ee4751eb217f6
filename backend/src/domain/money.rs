//! Conversion between decimal major units and integer minor units.
//!
//! Everything inside the domain and storage layers is `i64` minor units.
//! Decimals only exist at the HTTP boundary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::error::{DomainError, DomainResult};

const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Largest magnitude accepted for a single amount, in minor units. Keeps
/// ledger sums far from `i64` overflow.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// Convert a decimal amount such as `12.345` to minor units, rounding half
/// to even (`12.345` becomes `1234`, `12.355` becomes `1236`). Amounts above
/// [`MAX_AMOUNT_CENTS`] in either direction are rejected.
pub fn to_minor_units(amount: Decimal) -> DomainResult<i64> {
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_i64())
        .filter(|cents| cents.unsigned_abs() <= MAX_AMOUNT_CENTS.unsigned_abs())
        .ok_or_else(|| DomainError::invalid_amount(format!("Amount {} is out of range", amount)))
}

/// Convert minor units back to a two decimal place amount
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
