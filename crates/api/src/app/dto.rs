//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateLicenseRequest {
    pub content_id: String,
    pub subject_id: String,
}

/// Update body. The record's identity and creation instant are preserved
/// from the stored record, so only the mutable fields appear here.
#[derive(Debug, Deserialize)]
pub struct UpdateLicenseRequest {
    pub owner_subject_id: String,
    pub expiry_at: DateTime<Utc>,
}
