//! Identifier validation.
//!
//! Subject and content identifiers are opaque strings owned by external
//! provisioning systems; this layer only enforces that they are present.

use crate::{DomainError, DomainResult};

/// Reject a missing/blank identifier with `InvalidArgument`.
///
/// Returns the trimmed identifier so callers key stores consistently.
pub fn require_id<'a>(value: &'a str, what: &str) -> DomainResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_argument(format!(
            "{what} must be provided"
        )));
    }
    Ok(trimmed)
}
