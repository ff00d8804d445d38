use async_trait::async_trait;

use warden_application::UserRoleRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{RoleId, UserId};

use super::{PostgresAccessControlRepository, commit, map_assignment_error};

#[async_trait]
impl UserRoleRepository for PostgresAccessControlRepository {
    async fn add_users_to_role(&self, role_id: RoleId, user_ids: &[UserId]) -> AppResult<()> {
        let user_ids: Vec<uuid::Uuid> = user_ids.iter().map(UserId::as_uuid).collect();

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT users.user_id, $1
            FROM UNNEST($2::UUID[]) AS users(user_id)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(&user_ids)
        .execute(&self.pool)
        .await
        .map_err(|error| map_assignment_error(error, &format!("add users to role '{role_id}'")))?;

        Ok(())
    }

    async fn remove_users_from_role(
        &self,
        role_id: RoleId,
        user_ids: &[UserId],
    ) -> AppResult<()> {
        let user_ids: Vec<uuid::Uuid> = user_ids.iter().map(UserId::as_uuid).collect();

        sqlx::query("DELETE FROM user_roles WHERE role_id = $1 AND user_id = ANY($2)")
            .bind(role_id.as_uuid())
            .bind(&user_ids)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to remove users from role '{role_id}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn replace_roles_for_user(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<()> {
        let role_ids: Vec<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();
        let mut transaction = self.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to clear roles of user '{user_id}': {error}"
                ))
            })?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, roles.role_id
            FROM UNNEST($2::UUID[]) AS roles(role_id)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&role_ids)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_assignment_error(error, &format!("set roles of user '{user_id}'")))?;

        commit(transaction).await
    }

    async fn list_users_for_role(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        let user_ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT user_id
            FROM user_roles
            WHERE role_id = $1
            ORDER BY assigned_at, user_id
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list users of role '{role_id}': {error}"))
        })?;

        Ok(user_ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        let role_ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT role_id
            FROM user_roles
            WHERE user_id = $1
            ORDER BY assigned_at, role_id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list roles of user '{user_id}': {error}"))
        })?;

        Ok(role_ids.into_iter().map(RoleId::from_uuid).collect())
    }
}
