//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Transport
/// concerns (status codes, response bodies) belong to the API layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required identifier was missing or blank (caller error).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A license already exists for the content identifier.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An operation targeted a record that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A store failed below the domain layer (e.g. poisoned lock).
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
