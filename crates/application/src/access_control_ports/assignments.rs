use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{RoleId, UserId};

/// Repository port for the user-role relationship.
///
/// Delta operations are idempotent: adding a present pair or removing an
/// absent pair succeeds without changes.
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Adds the users to the role, ignoring existing pairs.
    async fn add_users_to_role(&self, role_id: RoleId, user_ids: &[UserId]) -> AppResult<()>;

    /// Removes the users from the role, ignoring absent pairs.
    async fn remove_users_from_role(&self, role_id: RoleId, user_ids: &[UserId])
    -> AppResult<()>;

    /// Sets the roles of a user to exactly the given ids.
    async fn replace_roles_for_user(&self, user_id: UserId, role_ids: &[RoleId])
    -> AppResult<()>;

    /// Lists the users assigned to a role.
    async fn list_users_for_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>>;

    /// Lists the role ids assigned to a user.
    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>>;
}
