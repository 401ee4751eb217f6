// Repository modules
pub mod allowance_repository;
pub mod child_repository;
pub mod ledger_repository;

// Re-export repository types
pub use allowance_repository::AllowanceRepository;
pub use child_repository::ChildRepository;
pub use ledger_repository::LedgerRepository;
