//! # REST API Interface Layer
//!
//! One module of handlers per resource, plus the DTO mappers. Every handler
//! logs its route on entry. Handlers that report balances run allowance
//! accrual for the current date before reading.

pub mod allowance_apis;
pub mod child_apis;
pub mod error;
pub mod health_apis;
pub mod mappers;
pub mod money_apis;

#[cfg(test)]
pub(crate) mod test_support;
