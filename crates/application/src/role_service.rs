//! Role aggregate administration and resolution.

use std::sync::Arc;

use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{
    PermissionId, Role, RoleId, RoleWithPermissions, dedupe_preserving_order,
    ensure_permission_count,
};

use crate::{AccessControlLimits, PermissionRepository, RoleRepository};

mod resolution;


/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name.
    pub name: String,
    /// Initial permission set, possibly empty.
    pub permission_ids: Vec<PermissionId>,
}

/// Input payload for updating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New role name.
    pub name: String,
    /// Replacement permission set. `None` keeps the current set.
    pub permission_ids: Option<Vec<PermissionId>>,
}

/// Application service for roles and their permission sets.
#[derive(Clone)]
pub struct RoleService {
    role_repository: Arc<dyn RoleRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
    max_permissions_per_role: usize,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
        limits: AccessControlLimits,
    ) -> Self {
        Self {
            role_repository,
            permission_repository,
            max_permissions_per_role: limits.max_permissions_per_role,
        }
    }

    /// Creates a role and returns it as read back from the store.
    ///
    /// A role that cannot be read back right after a successful write is an
    /// internal consistency error rather than `NotFound`.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions> {
        let role = Role::new(RoleId::new(), input.name)?;
        let permission_ids = self.checked_permission_ids(&input.permission_ids).await?;

        self.role_repository
            .create_role(&role, &permission_ids)
            .await?;

        let created = self.get_role(role.id()).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "role '{}' was created but could not be read back",
                role.id()
            ))
        })?;

        info!(
            role_id = %role.id(),
            name = role.name(),
            permissions = permission_ids.len(),
            "created role"
        );
        Ok(created)
    }

    /// Returns a role with its resolved permissions, or `None` when absent.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<Option<RoleWithPermissions>> {
        let Some(record) = self.role_repository.find_role(role_id).await? else {
            return Ok(None);
        };

        Ok(self.resolve_roles(vec![record]).await?.pop())
    }

    /// Lists every role with its resolved permissions.
    pub async fn list_roles_with_permissions(&self) -> AppResult<Vec<RoleWithPermissions>> {
        let records = self.role_repository.list_roles().await?;
        self.resolve_roles(records).await
    }

    /// Renames a role and optionally replaces its permission set.
    pub async fn update_role(
        &self,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleWithPermissions> {
        let role = Role::new(role_id, input.name)?;
        let permission_ids = match input.permission_ids {
            Some(permission_ids) => Some(self.checked_permission_ids(&permission_ids).await?),
            None => None,
        };

        self.role_repository
            .update_role(&role, permission_ids.as_deref())
            .await?;

        let updated = self.get_role(role_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "role '{role_id}' was updated but could not be read back"
            ))
        })?;

        info!(role_id = %role_id, name = role.name(), "updated role");
        Ok(updated)
    }

    /// Deletes a role together with its assignments.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.role_repository.delete_role(role_id).await?;

        info!(role_id = %role_id, "deleted role");
        Ok(())
    }

    /// Sets the role's permission set to exactly `permission_ids`.
    ///
    /// This is a full replacement: permissions not listed are detached.
    pub async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let permission_ids = self.checked_permission_ids(permission_ids).await?;

        self.role_repository
            .replace_role_permissions(role_id, &permission_ids)
            .await?;

        info!(
            role_id = %role_id,
            permissions = permission_ids.len(),
            "replaced role permissions"
        );
        Ok(())
    }

    /// Validates a requested permission set before any mutation.
    ///
    /// The raw length is checked against the limit first so oversized payloads
    /// are rejected without I/O. Duplicates are then dropped and every id must
    /// exist in the catalog.
    async fn checked_permission_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<PermissionId>> {
        ensure_permission_count(permission_ids.len(), self.max_permissions_per_role)?;

        let permission_ids = dedupe_preserving_order(permission_ids);
        if permission_ids.is_empty() {
            return Ok(permission_ids);
        }

        let known = self
            .permission_repository
            .list_permissions_by_ids(&permission_ids)
            .await?;

        if let Some(missing) = permission_ids
            .iter()
            .find(|id| !known.iter().any(|permission| permission.id() == **id))
        {
            return Err(AppError::NotFound(format!(
                "permission '{missing}' does not exist"
            )));
        }

        Ok(permission_ids)
    }
}
