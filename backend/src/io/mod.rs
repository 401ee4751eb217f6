//! # IO Module
//!
//! HTTP interface of the ledger. Handlers translate JSON bodies into domain
//! commands, call the services and map the results back to `shared` DTOs.
//! Domain errors become status codes with a `{"detail": "..."}` body.

pub mod rest;

pub use rest::*;
