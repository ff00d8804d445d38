//! Permission catalog administration.

use std::sync::Arc;

use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{Permission, PermissionId, PermissionScope, RoleId};

use crate::{PermissionRepository, RoleRepository};

#[cfg(test)]
mod tests;

/// Input payload for creating or replacing a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionInput {
    /// Capability value, for example `admin.roles.create`.
    pub value: String,
    /// Declared scope.
    pub scope: PermissionScope,
    /// Free-text description.
    pub description: String,
}

/// Application service for the permission catalog.
#[derive(Clone)]
pub struct PermissionService {
    permission_repository: Arc<dyn PermissionRepository>,
    role_repository: Arc<dyn RoleRepository>,
}

impl PermissionService {
    /// Creates a new permission service.
    #[must_use]
    pub fn new(
        permission_repository: Arc<dyn PermissionRepository>,
        role_repository: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            permission_repository,
            role_repository,
        }
    }

    /// Validates and stores a new permission.
    pub async fn create_permission(&self, input: PermissionInput) -> AppResult<Permission> {
        let permission = Permission::new(
            PermissionId::new(),
            input.value,
            input.scope,
            input.description,
        )?;

        self.permission_repository
            .create_permission(&permission)
            .await?;

        info!(
            permission_id = %permission.id(),
            value = permission.value(),
            "created permission"
        );
        Ok(permission)
    }

    /// Returns a permission, or `None` when it does not exist.
    pub async fn get_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        self.permission_repository
            .find_permission(permission_id)
            .await
    }

    /// Replaces value, scope and description of an existing permission.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: PermissionInput,
    ) -> AppResult<Permission> {
        let permission =
            Permission::new(permission_id, input.value, input.scope, input.description)?;

        self.permission_repository
            .update_permission(&permission)
            .await?;

        info!(permission_id = %permission_id, "updated permission");
        Ok(permission)
    }

    /// Deletes a permission. Roles referencing it keep a dangling reference.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.permission_repository
            .delete_permission(permission_id)
            .await?;

        info!(permission_id = %permission_id, "deleted permission");
        Ok(())
    }

    /// Lists the whole catalog.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.permission_repository.list_permissions().await
    }

    /// Lists the resolvable permissions attached to a role.
    pub async fn list_permissions_for_role(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let record = self
            .role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        self.permission_repository
            .list_permissions_by_ids(&record.permission_ids)
            .await
    }
}
