//! Eligibility policy knobs.

use chrono::Duration;

use entitle_auth::{Permission, Role};

/// Configuration for the no-license decision path and license issuance.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    /// Without a license, a subject must hold at least one of these roles.
    pub privileged_roles: Vec<Role>,

    /// Baseline permission every unlicensed access requires.
    pub required_permission: Permission,

    /// Validity window stamped onto newly created licenses.
    pub license_validity: Duration,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            privileged_roles: vec![Role::new("Admin"), Role::new("Premium User")],
            required_permission: Permission::new("LICENSE_ACCESS"),
            license_validity: Duration::days(30),
        }
    }
}
