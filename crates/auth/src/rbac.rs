//! Role/permission model for the no-license decision path.
//!
//! Roles and permissions are intentionally opaque strings at this layer; the
//! identity store resolves a role name to the permissions granted under it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier (e.g. "Admin", "Premium User").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission identifier (e.g. "LICENSE_ACCESS").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role resolved to the permissions it grants.
///
/// Produced by the identity store; the engine never mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub name: Role,
    pub permissions: Vec<Permission>,
}

impl RoleGrant {
    pub fn new(name: Role, permissions: Vec<Permission>) -> Self {
        Self { name, permissions }
    }

    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// A subject whose access is being evaluated: an identifier plus the roles
/// assigned to it (by reference; permissions resolve through the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub roles: Vec<Role>,
}

impl Subject {
    pub fn new(id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id: id.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}
