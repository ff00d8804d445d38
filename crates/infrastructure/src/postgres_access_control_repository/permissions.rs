use std::collections::HashMap;

use async_trait::async_trait;

use warden_application::PermissionRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{Permission, PermissionId};

use super::{PermissionRow, PostgresAccessControlRepository};

#[async_trait]
impl PermissionRepository for PostgresAccessControlRepository {
    async fn create_permission(&self, permission: &Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, value, scope, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.value())
        .bind(permission.scope().as_str())
        .bind(permission.description())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create permission '{}': {error}",
                permission.value()
            ))
        })?;

        Ok(())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, value, scope, description
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find permission '{permission_id}': {error}"
            ))
        })?;

        row.map(Permission::try_from).transpose()
    }

    async fn update_permission(&self, permission: &Permission) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE permissions
            SET value = $2, scope = $3, description = $4
            WHERE id = $1
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.value())
        .bind(permission.scope().as_str())
        .bind(permission.description())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update permission '{}': {error}",
                permission.id()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' does not exist",
                permission.id()
            )));
        }

        Ok(())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete permission '{permission_id}': {error}"
                ))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, value, scope, description
            FROM permissions
            ORDER BY value, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(Permission::try_from).collect()
    }

    async fn list_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, value, scope, description
            FROM permissions
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permissions by id: {error}"))
        })?;

        let mut by_id = rows
            .into_iter()
            .map(|row| Permission::try_from(row).map(|permission| (permission.id(), permission)))
            .collect::<AppResult<HashMap<_, _>>>()?;

        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| by_id.remove(permission_id))
            .collect())
    }
}
