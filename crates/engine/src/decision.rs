//! Eligibility decisions carry the signal that decided them.

use serde::Serialize;

/// The engine's answer for one (subject, content) pair at one instant.
///
/// Derived transiently from store state; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub reason: DecisionReason,
}

impl EligibilityDecision {
    pub fn granted(reason: DecisionReason) -> Self {
        Self {
            eligible: true,
            reason,
        }
    }

    pub fn denied(reason: DecisionReason) -> Self {
        Self {
            eligible: false,
            reason,
        }
    }
}

/// Which signal in the decision procedure settled the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// A license record exists and the subject owns it, unexpired.
    LicenseOwned,
    /// A license record exists for the subject but its expiry has passed.
    LicenseExpired,
    /// A license record exists and belongs to a different subject.
    NotLicenseOwner,
    /// No license; the subject holds none of the privileged roles.
    MissingPrivilegedRole,
    /// No license; the subject lacks the baseline permission.
    MissingBaselinePermission,
    /// No license; a per-content rule was not satisfied.
    RuleUnsatisfied,
    /// No license; every gate passed and every rule matched.
    RequirementsSatisfied,
}
