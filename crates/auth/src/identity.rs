//! Per-request verified identity.

use crate::claims::TokenClaims;

/// The identity established by a successful bearer verification.
///
/// Immutable and scoped to a single request: the middleware attaches it to
/// the request it verified and nothing else. There is no process-wide
/// security context.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    subject_id: String,
    claims: TokenClaims,
}

impl VerifiedIdentity {
    pub fn new(claims: TokenClaims) -> Self {
        Self {
            subject_id: claims.sub.clone(),
            claims,
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }
}
