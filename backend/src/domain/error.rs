//! Errors surfaced by the domain services.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced child does not exist
    #[error("Child not found: {0}")]
    ChildNotFound(i64),

    /// A monetary amount has the wrong sign or cannot be represented
    #[error("{0}")]
    InvalidAmount(String),

    /// Any other malformed input
    #[error("{0}")]
    Validation(String),

    /// The store failed; passed through unchanged
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl DomainError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for errors caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::Persistence(_))
    }
}
