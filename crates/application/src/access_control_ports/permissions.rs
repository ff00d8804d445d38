use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{Permission, PermissionId};

/// Repository port for the permission catalog.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Persists a new permission.
    async fn create_permission(&self, permission: &Permission) -> AppResult<()>;

    /// Finds a permission by id.
    async fn find_permission(&self, permission_id: PermissionId)
    -> AppResult<Option<Permission>>;

    /// Replaces a stored permission. Fails with `NotFound` when it does not exist.
    async fn update_permission(&self, permission: &Permission) -> AppResult<()>;

    /// Deletes a permission. Fails with `NotFound` when it does not exist.
    ///
    /// Role references are left untouched.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Lists the whole catalog ordered by value.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists the permissions matching the given ids. Unknown ids are skipped.
    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>>;
}
