//! # Storage Module
//!
//! SQLite persistence for children and their ledger events.
//!
//! - **connection**: pool setup and schema creation
//! - **traits**: storage abstractions the domain services are written against
//! - **repositories**: SQLite implementations of those traits
//!
//! Every multi-row write (child creation with a starting balance, child
//! deletion, an accrual batch) runs inside a single SQLite transaction.

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{AllowanceRepository, ChildRepository, LedgerRepository};
pub use traits::{AllowanceStorage, ChildStorage, Connection, LedgerStorage};
