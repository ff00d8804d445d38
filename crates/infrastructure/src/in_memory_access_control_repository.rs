use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_application::{PermissionRepository, RoleRecord, RoleRepository, UserRoleRepository};
use warden_core::{AppError, AppResult};
use warden_domain::{Permission, PermissionId, Role, RoleId, UserId};


#[derive(Debug, Default)]
struct AccessControlTables {
    permissions: HashMap<PermissionId, Permission>,
    roles: HashMap<RoleId, RoleRecord>,
    assignments: BTreeSet<(UserId, RoleId)>,
}

/// In-memory store for permissions, roles and user-role assignments.
///
/// All three tables sit behind one lock so that deleting a role and its
/// assignments is a single step.
#[derive(Debug, Default)]
pub struct InMemoryAccessControlRepository {
    tables: RwLock<AccessControlTables>,
}

impl InMemoryAccessControlRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_role(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' does not exist"))
}

#[async_trait]
impl PermissionRepository for InMemoryAccessControlRepository {
    async fn create_permission(&self, permission: &Permission) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        if tables.permissions.contains_key(&permission.id()) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                permission.id()
            )));
        }

        tables
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .tables
            .read()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn update_permission(&self, permission: &Permission) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables.permissions.get_mut(&permission.id()).ok_or_else(|| {
            AppError::NotFound(format!("permission '{}' does not exist", permission.id()))
        })?;

        *stored = permission.clone();
        Ok(())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.tables
            .write()
            .await
            .permissions
            .remove(&permission_id)
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;

        let mut permissions: Vec<Permission> = tables.permissions.values().cloned().collect();
        permissions.sort_by(|left, right| {
            left.value()
                .cmp(right.value())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(permissions)
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;

        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| tables.permissions.get(permission_id).cloned())
            .collect())
    }
}

#[async_trait]
impl RoleRepository for InMemoryAccessControlRepository {
    async fn create_role(&self, role: &Role, permission_ids: &[PermissionId]) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        if tables.roles.contains_key(&role.id()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.id()
            )));
        }

        tables.roles.insert(
            role.id(),
            RoleRecord {
                role: role.clone(),
                permission_ids: permission_ids.to_vec(),
            },
        );
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        Ok(self.tables.read().await.roles.get(&role_id).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let tables = self.tables.read().await;

        let mut roles: Vec<RoleRecord> = tables.roles.values().cloned().collect();
        roles.sort_by(|left, right| {
            left.role
                .name()
                .cmp(right.role.name())
                .then_with(|| left.role.id().cmp(&right.role.id()))
        });
        Ok(roles)
    }

    async fn list_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleRecord>> {
        let tables = self.tables.read().await;

        Ok(role_ids
            .iter()
            .filter_map(|role_id| tables.roles.get(role_id).cloned())
            .collect())
    }

    async fn update_role(
        &self,
        role: &Role,
        permission_ids: Option<&[PermissionId]>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .roles
            .get_mut(&role.id())
            .ok_or_else(|| missing_role(role.id()))?;

        record.role = role.clone();
        if let Some(permission_ids) = permission_ids {
            record.permission_ids = permission_ids.to_vec();
        }
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        tables
            .roles
            .remove(&role_id)
            .ok_or_else(|| missing_role(role_id))?;
        tables
            .assignments
            .retain(|(_, assigned_role)| *assigned_role != role_id);
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| missing_role(role_id))?;

        record.permission_ids = permission_ids.to_vec();
        Ok(())
    }
}

#[async_trait]
impl UserRoleRepository for InMemoryAccessControlRepository {
    async fn add_users_to_role(&self, role_id: RoleId, user_ids: &[UserId]) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) {
            return Err(missing_role(role_id));
        }

        tables
            .assignments
            .extend(user_ids.iter().map(|user_id| (*user_id, role_id)));
        Ok(())
    }

    async fn remove_users_from_role(
        &self,
        role_id: RoleId,
        user_ids: &[UserId],
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        for user_id in user_ids {
            tables.assignments.remove(&(*user_id, role_id));
        }
        Ok(())
    }

    async fn replace_roles_for_user(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = role_ids
            .iter()
            .find(|role_id| !tables.roles.contains_key(role_id))
        {
            return Err(missing_role(*missing));
        }

        tables
            .assignments
            .retain(|(assigned_user, _)| *assigned_user != user_id);
        tables
            .assignments
            .extend(role_ids.iter().map(|role_id| (user_id, *role_id)));
        Ok(())
    }

    async fn list_users_for_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        let tables = self.tables.read().await;

        Ok(tables
            .assignments
            .iter()
            .filter_map(|(user_id, assigned_role)| (*assigned_role == role_id).then_some(*user_id))
            .collect())
    }

    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        let tables = self.tables.read().await;

        Ok(tables
            .assignments
            .range((user_id, RoleId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(|(assigned_user, _)| *assigned_user == user_id)
            .map(|(_, role_id)| *role_id)
            .collect())
    }
}
