//! License persistence contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use entitle_core::LicenseRecord;

use crate::error::{StoreError, StoreResult};

/// License persistence, keyed by content identifier.
///
/// The store itself is a plain keyed collection; the one-record-per-content
/// invariant and the read-decide-write atomicity of mutations live in the
/// engine, which serializes its write path.
pub trait LicenseStore: Send + Sync {
    fn find_by_content_id(&self, content_id: &str) -> StoreResult<Option<LicenseRecord>>;

    /// Insert or replace the record for its content identifier.
    fn save(&self, record: LicenseRecord) -> StoreResult<LicenseRecord>;

    /// Remove the record; returns whether one existed.
    fn delete_by_content_id(&self, content_id: &str) -> StoreResult<bool>;

    fn find_all(&self) -> StoreResult<Vec<LicenseRecord>>;
}

/// In-memory license store for tests/dev. Not durable.
#[derive(Debug, Default)]
pub struct InMemoryLicenseStore {
    records: RwLock<HashMap<String, LicenseRecord>>,
}

impl InMemoryLicenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for InMemoryLicenseStore {
    fn find_by_content_id(&self, content_id: &str) -> StoreResult<Option<LicenseRecord>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(content_id).cloned())
    }

    fn save(&self, record: LicenseRecord) -> StoreResult<LicenseRecord> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.insert(record.content_id.clone(), record.clone());
        Ok(record)
    }

    fn delete_by_content_id(&self, content_id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.remove(content_id).is_some())
    }

    fn find_all(&self) -> StoreResult<Vec<LicenseRecord>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut all: Vec<LicenseRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.content_id.cmp(&b.content_id));
        Ok(all)
    }
}
