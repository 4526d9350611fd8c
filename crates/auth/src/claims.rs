//! Structured token claims (transport-agnostic).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// The claims the service expects once a bearer token has been decoded.
///
/// Anything beyond the subject and the time window lands in `extra`, so
/// downstream code reads a plain key/value map rather than re-parsing the
/// token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier the token was issued for.
    pub sub: String,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    /// Remaining claims, verbatim.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenClaims {
    pub fn new(sub: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: sub.into(),
            issued_at,
            expires_at,
            extra: HashMap::new(),
        }
    }
}

/// Deterministically validate the claim time window.
///
/// Signature verification happens in [`crate::token`]; this checks only the
/// window, against the caller-supplied clock. The expiry comparison is
/// strict: a token at exactly its expiry instant is expired.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.expires_at <= claims.issued_at {
        return Err(AuthError::InvalidToken);
    }
    if now >= claims.expires_at {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued: DateTime<Utc>, expires: DateTime<Utc>) -> TokenClaims {
        TokenClaims::new("u1", issued, expires)
    }

    #[test]
    fn live_window_validates() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        assert!(validate_claims(&c, now).is_ok());
    }

    #[test]
    fn expired_window_rejected() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(validate_claims(&c, now), Err(AuthError::TokenExpired));
    }

    #[test]
    fn expiry_instant_is_expired() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(5), now);
        assert_eq!(validate_claims(&c, now), Err(AuthError::TokenExpired));
    }

    #[test]
    fn inverted_window_rejected() {
        let now = Utc::now();
        let c = claims(now, now - Duration::minutes(1));
        assert_eq!(validate_claims(&c, now), Err(AuthError::InvalidToken));
    }
}
