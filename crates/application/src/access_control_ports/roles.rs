use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{PermissionId, Role, RoleId};

/// Stored role with the raw permission references it holds.
///
/// References may point at permissions that no longer exist; resolution skips
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Role entity.
    pub role: Role,
    /// Referenced permission ids.
    pub permission_ids: Vec<PermissionId>,
}

/// Repository port for roles and their permission sets.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Persists a role with its initial permission set.
    async fn create_role(&self, role: &Role, permission_ids: &[PermissionId]) -> AppResult<()>;

    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>>;

    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;

    /// Lists the roles matching the given ids. Unknown ids are skipped.
    async fn list_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleRecord>>;

    /// Renames a role and, when given, replaces its permission set.
    ///
    /// Fails with `NotFound` when the role does not exist.
    async fn update_role(
        &self,
        role: &Role,
        permission_ids: Option<&[PermissionId]>,
    ) -> AppResult<()>;

    /// Deletes a role and its assignments. Fails with `NotFound` when absent.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Sets the permission set of a role to exactly the given ids.
    ///
    /// Fails with `NotFound` when the role does not exist.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;
}
