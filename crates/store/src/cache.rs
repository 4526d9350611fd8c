//! Decision cache: memoized license state keyed by content identifier.
//!
//! The cache deliberately keys on content, not subject: the cached value is
//! the content-scoped license snapshot, and the per-subject boolean is
//! derived from it at read time. Entries carry no TTL; only the engine's
//! license mutations (and read-through on the query path) change them.

use std::collections::HashMap;
use std::sync::RwLock;

use entitle_core::LicenseRecord;

use crate::error::{StoreError, StoreResult};

/// Explicit cache interface, called directly inside the engine's operations
/// so cache/store consistency is visible in one place.
pub trait DecisionCache: Send + Sync {
    fn get(&self, content_id: &str) -> StoreResult<Option<LicenseRecord>>;

    fn put(&self, record: LicenseRecord) -> StoreResult<()>;

    fn invalidate(&self, content_id: &str) -> StoreResult<()>;
}

/// In-process decision cache. No cross-node coordination.
#[derive(Debug, Default)]
pub struct InMemoryDecisionCache {
    entries: RwLock<HashMap<String, LicenseRecord>>,
}

impl InMemoryDecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries (test/diagnostic aid).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DecisionCache for InMemoryDecisionCache {
    fn get(&self, content_id: &str) -> StoreResult<Option<LicenseRecord>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(content_id).cloned())
    }

    fn put(&self, record: LicenseRecord) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(record.content_id.clone(), record);
        Ok(())
    }

    fn invalidate(&self, content_id: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(content_id);
        Ok(())
    }
}
