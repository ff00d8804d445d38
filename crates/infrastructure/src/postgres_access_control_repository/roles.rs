use async_trait::async_trait;

use warden_application::{RoleRecord, RoleRepository};
use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, Role, RoleId};

use super::{
    PostgresAccessControlRepository, RoleRow, aggregate_roles, commit, insert_role_permissions,
};

const ROLE_SELECT: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.name AS role_name,
        grants.permission_id
    FROM roles
    LEFT JOIN role_permissions AS grants
        ON grants.role_id = roles.id
"#;

impl PostgresAccessControlRepository {
    async fn lock_role(
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        role_id: RoleId,
    ) -> AppResult<()> {
        sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
            .bind(role_id.as_uuid())
            .fetch_optional(&mut **transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock role '{role_id}': {error}"))
            })?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn clear_role_permissions(
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        role_id: RoleId,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut **transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to clear permissions of role '{role_id}': {error}"
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl RoleRepository for PostgresAccessControlRepository {
    async fn create_role(&self, role: &Role, permission_ids: &[PermissionId]) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query("INSERT INTO roles (id, name) VALUES ($1, $2)")
            .bind(role.id().as_uuid())
            .bind(role.name())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to create role '{}': {error}", role.name()))
            })?;

        insert_role_permissions(&mut transaction, role.id(), permission_ids).await?;
        commit(transaction).await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} WHERE roles.id = $1 ORDER BY grants.position"
        ))
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{role_id}': {error}")))?;

        Ok(aggregate_roles(rows)?.pop())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} ORDER BY roles.name, roles.id, grants.position"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        aggregate_roles(rows)
    }

    async fn list_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleRecord>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} WHERE roles.id = ANY($1) \
             ORDER BY array_position($1, roles.id), grants.position"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles by id: {error}")))?;

        aggregate_roles(rows)
    }

    async fn update_role(
        &self,
        role: &Role,
        permission_ids: Option<&[PermissionId]>,
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        let result = sqlx::query("UPDATE roles SET name = $2 WHERE id = $1")
            .bind(role.id().as_uuid())
            .bind(role.name())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to update role '{}': {error}", role.id()))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id()
            )));
        }

        if let Some(permission_ids) = permission_ids {
            Self::clear_role_permissions(&mut transaction, role.id()).await?;
            insert_role_permissions(&mut transaction, role.id(), permission_ids).await?;
        }

        commit(transaction).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        // role_permissions and user_roles rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role '{role_id}': {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        Self::lock_role(&mut transaction, role_id).await?;
        Self::clear_role_permissions(&mut transaction, role_id).await?;
        insert_role_permissions(&mut transaction, role_id, permission_ids).await?;

        commit(transaction).await
    }
}
