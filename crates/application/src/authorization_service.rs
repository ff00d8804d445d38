//! Permission checks for request handlers.

use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{RoleWithPermissions, SystemPermission, UserId, check_permission};

use crate::UserRoleService;


/// Application service that answers allow/deny questions for a principal.
///
/// Roles are resolved from the store on every call and never cached, so an
/// assignment change applies to the very next check.
#[derive(Clone)]
pub struct AuthorizationService {
    user_role_service: UserRoleService,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(user_role_service: UserRoleService) -> Self {
        Self { user_role_service }
    }

    /// Resolves the principal's current roles with their permissions.
    pub async fn resolve_roles(&self, user_id: UserId) -> AppResult<Vec<RoleWithPermissions>> {
        self.user_role_service
            .list_roles_with_permissions_for_user(user_id)
            .await
    }

    /// Returns whether the principal currently holds the capability.
    pub async fn has_permission(&self, user_id: UserId, required: &str) -> AppResult<bool> {
        let roles = self.resolve_roles(user_id).await?;
        Ok(check_permission(&roles, required))
    }

    /// Ensures the principal holds a system permission.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        permission: SystemPermission,
    ) -> AppResult<()> {
        if self.has_permission(user_id, permission.as_str()).await? {
            return Ok(());
        }

        info!(
            user_id = %user_id,
            permission = permission.as_str(),
            "denied access"
        );
        Err(AppError::Forbidden(format!(
            "user '{user_id}' is missing permission '{}'",
            permission.as_str()
        )))
    }
}
