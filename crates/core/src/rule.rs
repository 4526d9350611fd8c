//! Per-content access rules, used when no explicit license exists.

use serde::{Deserialize, Serialize};

/// A requirement pairing a role and a permission for one content identifier.
///
/// Rules are provisioned independently and are read-only to the engine. A
/// subject must satisfy **both** halves of every rule attached to a content
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub content_id: String,
    pub required_role: String,
    pub required_permission: String,
}

impl Rule {
    pub fn new(
        content_id: impl Into<String>,
        required_role: impl Into<String>,
        required_permission: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            required_role: required_role.into(),
            required_permission: required_permission.into(),
        }
    }
}
