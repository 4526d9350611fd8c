//! `entitle-core` — domain foundation for the entitlement service.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! the error taxonomy, the license record, per-content rules, and identifier
//! validation shared by the engine and the stores.

pub mod error;
pub mod ident;
pub mod license;
pub mod rule;

pub use error::{DomainError, DomainResult};
pub use ident::require_id;
pub use license::LicenseRecord;
pub use rule::Rule;
