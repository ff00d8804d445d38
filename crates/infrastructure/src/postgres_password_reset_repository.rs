//! PostgreSQL-backed password reset request repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warden_application::PasswordResetRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{PasswordResetRequest, ResetRequestId, UserId};

/// PostgreSQL implementation of the password reset repository port.
///
/// The `UNIQUE (user_id)` constraint serializes concurrent creations: the
/// losing insert surfaces as `Conflict`.
#[derive(Clone)]
pub struct PostgresPasswordResetRepository {
    pool: PgPool,
}

impl PostgresPasswordResetRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResetRequestRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    token_hash: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<ResetRequestRow> for PasswordResetRequest {
    fn from(row: ResetRequestRow) -> Self {
        Self::new(
            ResetRequestId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.token_hash,
            row.expires_at,
        )
    }
}

fn map_create_error(error: sqlx::Error, user_id: UserId) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "user '{user_id}' already has a stored password reset request"
        ));
    }

    AppError::Internal(format!(
        "failed to create password reset request for user '{user_id}': {error}"
    ))
}

#[async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    async fn create_request(&self, request: &PasswordResetRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_requests (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.user_id().as_uuid())
        .bind(request.token_hash())
        .bind(request.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|error| map_create_error(error, request.user_id()))?;

        Ok(())
    }

    async fn find_request(
        &self,
        request_id: ResetRequestId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        let row = sqlx::query_as::<_, ResetRequestRow>(
            r#"
            SELECT id, user_id, token_hash, expires_at
            FROM password_reset_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find password reset request '{request_id}': {error}"
            ))
        })?;

        Ok(row.map(PasswordResetRequest::from))
    }

    async fn find_request_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        let row = sqlx::query_as::<_, ResetRequestRow>(
            r#"
            SELECT id, user_id, token_hash, expires_at
            FROM password_reset_requests
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find password reset request of user '{user_id}': {error}"
            ))
        })?;

        Ok(row.map(PasswordResetRequest::from))
    }

    async fn delete_request(&self, request_id: ResetRequestId) -> AppResult<()> {
        sqlx::query("DELETE FROM password_reset_requests WHERE id = $1")
            .bind(request_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete password reset request '{request_id}': {error}"
                ))
            })?;

        Ok(())
    }
}
