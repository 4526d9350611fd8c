//! Store failure model.

use entitle_core::DomainError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure-level store failure.
///
/// Kept separate from [`DomainError`]: a poisoned lock is not a business
/// outcome. The engine converts at its boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::store(err.to_string())
    }
}
