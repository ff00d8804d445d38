//! User-role assignment.

use std::sync::Arc;

use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{RoleId, RoleWithPermissions, UserId, dedupe_preserving_order};

use crate::{AccessControlLimits, RoleRepository, RoleService, UserRoleRepository};

#[cfg(test)]
mod tests;

/// Application service for the many-to-many link between users and roles.
///
/// `add`/`remove` apply deltas; `set` replaces a user's whole membership.
/// All of them are safe to retry.
#[derive(Clone)]
pub struct UserRoleService {
    user_role_repository: Arc<dyn UserRoleRepository>,
    role_repository: Arc<dyn RoleRepository>,
    role_service: RoleService,
    limits: AccessControlLimits,
}

impl UserRoleService {
    /// Creates a new user-role service.
    #[must_use]
    pub fn new(
        user_role_repository: Arc<dyn UserRoleRepository>,
        role_repository: Arc<dyn RoleRepository>,
        role_service: RoleService,
        limits: AccessControlLimits,
    ) -> Self {
        Self {
            user_role_repository,
            role_repository,
            role_service,
            limits,
        }
    }

    /// Adds users to a role and returns the distinct ids processed.
    ///
    /// Pairs that already exist are left as they are.
    pub async fn add_users_to_role(
        &self,
        role_id: RoleId,
        user_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let user_ids = self.checked_user_batch(user_ids)?;
        self.ensure_role_exists(role_id).await?;

        self.user_role_repository
            .add_users_to_role(role_id, &user_ids)
            .await?;

        info!(role_id = %role_id, users = user_ids.len(), "added users to role");
        Ok(user_ids)
    }

    /// Removes users from a role and returns the distinct ids processed.
    ///
    /// Users that do not hold the role are ignored.
    pub async fn remove_users_from_role(
        &self,
        role_id: RoleId,
        user_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let user_ids = self.checked_user_batch(user_ids)?;
        self.ensure_role_exists(role_id).await?;

        self.user_role_repository
            .remove_users_from_role(role_id, &user_ids)
            .await?;

        info!(role_id = %role_id, users = user_ids.len(), "removed users from role");
        Ok(user_ids)
    }

    /// Sets the roles of a user to exactly `role_ids`. An empty list clears them.
    pub async fn set_roles_for_user(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()> {
        if role_ids.len() > self.limits.max_roles_per_user {
            return Err(AppError::Validation(format!(
                "role count {} exceeds the limit of {}",
                role_ids.len(),
                self.limits.max_roles_per_user
            )));
        }

        let role_ids = dedupe_preserving_order(role_ids);
        if !role_ids.is_empty() {
            let known = self.role_repository.list_roles_by_ids(&role_ids).await?;
            if let Some(missing) = role_ids
                .iter()
                .find(|id| !known.iter().any(|record| record.role.id() == **id))
            {
                return Err(AppError::NotFound(format!("role '{missing}' does not exist")));
            }
        }

        self.user_role_repository
            .replace_roles_for_user(user_id, &role_ids)
            .await?;

        info!(user_id = %user_id, roles = role_ids.len(), "replaced user roles");
        Ok(())
    }

    /// Lists the users assigned to a role.
    pub async fn list_users_for_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        self.ensure_role_exists(role_id).await?;
        self.user_role_repository.list_users_for_role(role_id).await
    }

    /// Resolves the roles of a user together with their permissions.
    ///
    /// Always reads from the store; the result reflects the current assignment.
    pub async fn list_roles_with_permissions_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleWithPermissions>> {
        let role_ids = self
            .user_role_repository
            .list_role_ids_for_user(user_id)
            .await?;
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.role_repository.list_roles_by_ids(&role_ids).await?;
        self.role_service.resolve_roles(records).await
    }

    fn checked_user_batch(&self, user_ids: &[UserId]) -> AppResult<Vec<UserId>> {
        if user_ids.is_empty() {
            return Err(AppError::Validation(
                "user id list must not be empty".to_owned(),
            ));
        }

        if user_ids.len() > self.limits.max_users_per_batch {
            return Err(AppError::Validation(format!(
                "user id count {} exceeds the limit of {}",
                user_ids.len(),
                self.limits.max_users_per_batch
            )));
        }

        Ok(dedupe_preserving_order(user_ids))
    }

    async fn ensure_role_exists(&self, role_id: RoleId) -> AppResult<()> {
        self.role_repository
            .find_role(role_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}
