use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, NonEmptyString};

use crate::{Permission, RoleId};

/// Default bound on the number of permissions a single role may carry.
pub const DEFAULT_MAX_PERMISSIONS_PER_ROLE: usize = 64;

/// Named role that groups permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
}

impl Role {
    /// Creates a validated role. The name is trimmed and must not be empty.
    pub fn new(id: RoleId, name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        let name = NonEmptyString::for_field("role name", name.trim())?;

        Ok(Self { id, name })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Role together with its resolved permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWithPermissions {
    role: Role,
    permissions: Vec<Permission>,
}

impl RoleWithPermissions {
    /// Creates a resolved role view.
    #[must_use]
    pub fn new(role: Role, permissions: Vec<Permission>) -> Self {
        Self { role, permissions }
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Returns the resolved permissions.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_slice()
    }

    /// Returns whether any resolved permission carries the given value.
    #[must_use]
    pub fn grants(&self, value: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.value() == value)
    }
}

/// Ensures a permission set fits the configured per-role limit.
pub fn ensure_permission_count(count: usize, limit: usize) -> AppResult<()> {
    if count > limit {
        return Err(AppError::Validation(format!(
            "role permission count {count} exceeds the limit of {limit}"
        )));
    }

    Ok(())
}
