//! `entitle-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! subjects, roles and permissions, structured token claims, and the bearer
//! credential verification seam. The API layer turns its outputs into
//! transport responses; the engine consumes its identity model.

pub mod claims;
pub mod error;
pub mod identity;
pub mod rbac;
pub mod token;

pub use claims::{TokenClaims, validate_claims};
pub use error::AuthError;
pub use identity::VerifiedIdentity;
pub use rbac::{Permission, Role, RoleGrant, Subject};
pub use token::{Hs256TokenVerifier, TokenVerifier};
