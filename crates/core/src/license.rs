//! The license record: the authoritative, explicitly granted entitlement for
//! one content identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A license granting one subject access to one content identifier.
///
/// # Invariants
/// - At most one record exists per `content_id` (enforced by the engine's
///   create path, not by this type).
/// - `created_at` is assigned once and preserved across updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Stable record identifier, assigned at creation.
    pub id: Uuid,

    /// The content this license covers (unique key).
    pub content_id: String,

    /// The subject the license was granted to.
    pub owner_subject_id: String,

    pub created_at: DateTime<Utc>,
    pub expiry_at: DateTime<Utc>,
}

impl LicenseRecord {
    /// Create a fresh record valid for `validity` from `now`.
    pub fn issue(
        content_id: impl Into<String>,
        owner_subject_id: impl Into<String>,
        now: DateTime<Utc>,
        validity: chrono::Duration,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            content_id: content_id.into(),
            owner_subject_id: owner_subject_id.into(),
            created_at: now,
            expiry_at: now + validity,
        }
    }

    /// Whether this license grants `subject_id` access at `now`.
    ///
    /// Expiry uses a strict "after" comparison: a record exactly at its
    /// expiry instant no longer grants access.
    pub fn grants(&self, subject_id: &str, now: DateTime<Utc>) -> bool {
        self.owner_subject_id == subject_id && self.expiry_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn grants_owner_before_expiry() {
        let now = Utc::now();
        let lic = LicenseRecord::issue("c1", "u1", now, Duration::days(30));
        assert!(lic.grants("u1", now));
        assert_eq!(lic.expiry_at, now + Duration::days(30));
    }

    #[test]
    fn denies_other_subjects() {
        let now = Utc::now();
        let lic = LicenseRecord::issue("c1", "u1", now, Duration::days(30));
        assert!(!lic.grants("u2", now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let lic = LicenseRecord::issue("c1", "u1", now, Duration::days(30));
        assert!(!lic.grants("u1", lic.expiry_at));
        assert!(lic.grants("u1", lic.expiry_at - Duration::seconds(1)));
    }
}
