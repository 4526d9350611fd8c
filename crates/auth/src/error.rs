//! Authentication failure taxonomy.
//!
//! All variants are fail-closed: a failed verification attaches no identity.
//! None of the messages carry raw token material.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credential was malformed or its signature did not verify.
    #[error("invalid token")]
    InvalidToken,

    /// The credential verified but its expiry instant has passed.
    #[error("token expired")]
    TokenExpired,

    /// The verifier itself failed in an unexpected way. Logged at error
    /// severity by callers; the other variants are routine.
    #[error("token verification failed: {0}")]
    Unverifiable(String),
}
