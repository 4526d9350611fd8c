//! `entitle-store` — store contracts and in-memory implementations.
//!
//! The engine only sees the traits defined here; the in-memory variants back
//! tests, development, and single-process deployments. Each store is safe
//! under concurrent access: reads take shared locks, writes exclusive ones,
//! and a completed write to a key is visible to subsequent reads of it.

pub mod cache;
pub mod error;
pub mod identity;
pub mod license;
pub mod rule;

pub use cache::{DecisionCache, InMemoryDecisionCache};
pub use error::{StoreError, StoreResult};
pub use identity::{IdentityStore, InMemoryIdentityStore};
pub use license::{InMemoryLicenseStore, LicenseStore};
pub use rule::{InMemoryRuleStore, RuleStore};
