//! `entitle-engine` — the entitlement decision engine.
//!
//! Given a subject and a content identifier, the engine combines three
//! sources of truth with a fixed precedence: an explicit license record
//! (authoritative when present), the RBAC graph, and per-content rules. It
//! owns the license lifecycle and keeps the decision cache coherent with
//! every mutation.

pub mod decision;
pub mod engine;
pub mod policy;

pub use decision::{DecisionReason, EligibilityDecision};
pub use engine::EntitlementEngine;
pub use policy::EligibilityPolicy;
