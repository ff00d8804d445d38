//! PostgreSQL-backed permission catalog, roles and user-role assignments.

use std::collections::HashMap;
use std::str::FromStr;

use sqlx::{FromRow, PgPool, Postgres, Transaction};

use warden_application::RoleRecord;
use warden_core::{AppError, AppResult};
use warden_domain::{Permission, PermissionId, PermissionScope, Role, RoleId};

mod assignments;
mod permissions;
mod roles;

/// PostgreSQL implementation of the three access-control repository ports.
#[derive(Clone)]
pub struct PostgresAccessControlRepository {
    pool: PgPool,
}

impl PostgresAccessControlRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    value: String,
    scope: String,
    description: String,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        let scope = PermissionScope::from_str(&row.scope).map_err(|error| {
            AppError::Internal(format!(
                "stored permission '{}' has an invalid scope: {error}",
                row.id
            ))
        })?;

        Permission::new(
            PermissionId::from_uuid(row.id),
            row.value,
            scope,
            row.description,
        )
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    permission_id: Option<uuid::Uuid>,
}

/// Folds joined role rows into records, keeping the query's row order.
fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<RoleRecord>> {
    let mut records: Vec<RoleRecord> = Vec::new();
    let mut positions: HashMap<uuid::Uuid, usize> = HashMap::new();

    for row in rows {
        let index = match positions.get(&row.role_id) {
            Some(index) => *index,
            None => {
                records.push(RoleRecord {
                    role: Role::new(RoleId::from_uuid(row.role_id), row.role_name)?,
                    permission_ids: Vec::new(),
                });
                positions.insert(row.role_id, records.len() - 1);
                records.len() - 1
            }
        };

        if let (Some(permission_id), Some(record)) = (row.permission_id, records.get_mut(index)) {
            record
                .permission_ids
                .push(PermissionId::from_uuid(permission_id));
        }
    }

    Ok(records)
}

/// Inserts a permission set, preserving list order in `position`.
async fn insert_role_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: RoleId,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    if permission_ids.is_empty() {
        return Ok(());
    }

    let permission_ids: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();

    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id, position)
        SELECT $1, ids.permission_id, ids.ordinality::INTEGER
        FROM UNNEST($2::UUID[]) WITH ORDINALITY AS ids(permission_id, ordinality)
        ON CONFLICT (role_id, permission_id) DO NOTHING
        "#,
    )
    .bind(role_id.as_uuid())
    .bind(&permission_ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to persist permissions of role '{role_id}': {error}"
        ))
    })?;

    Ok(())
}

/// Maps foreign-key violations on `role_id` to `NotFound`.
fn map_assignment_error(error: sqlx::Error, action: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!("failed to {action}: role does not exist"));
    }

    AppError::Internal(format!("failed to {action}: {error}"))
}
