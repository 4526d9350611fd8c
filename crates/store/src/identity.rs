//! Identity reference data: subjects, roles, and the permissions they grant.

use std::collections::HashMap;
use std::sync::RwLock;

use entitle_auth::{RoleGrant, Subject};

use crate::error::{StoreError, StoreResult};

/// Read-mostly identity lookups consumed by the engine.
///
/// Subjects reference roles by name; a role resolves to the permissions it
/// grants. The engine never mutates identity data.
pub trait IdentityStore: Send + Sync {
    fn find_subject(&self, id: &str) -> StoreResult<Option<Subject>>;

    fn find_role_by_name(&self, name: &str) -> StoreResult<Option<RoleGrant>>;
}

/// In-memory identity store.
///
/// The `upsert_*` methods are the provisioning surface (user/role
/// administration is external to the engine); tests and dev setups seed
/// through them.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    subjects: RwLock<HashMap<String, Subject>>,
    roles: RwLock<HashMap<String, RoleGrant>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_subject(&self, subject: Subject) -> StoreResult<()> {
        let mut subjects = self.subjects.write().map_err(|_| StoreError::LockPoisoned)?;
        subjects.insert(subject.id.clone(), subject);
        Ok(())
    }

    pub fn upsert_role(&self, role: RoleGrant) -> StoreResult<()> {
        let mut roles = self.roles.write().map_err(|_| StoreError::LockPoisoned)?;
        roles.insert(role.name.as_str().to_string(), role);
        Ok(())
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_subject(&self, id: &str) -> StoreResult<Option<Subject>> {
        let subjects = self.subjects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(subjects.get(id).cloned())
    }

    fn find_role_by_name(&self, name: &str) -> StoreResult<Option<RoleGrant>> {
        let roles = self.roles.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(roles.get(name).cloned())
    }
}
