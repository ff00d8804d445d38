use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use warden_application::{
    PasswordResetRepository, PermissionRepository, RoleRepository, UserRepository,
    UserRoleRepository,
};
use warden_core::AppResult;
use warden_domain::{EmailAddress, UserAccount, UserId};
use warden_infrastructure::{
    InMemoryAccessControlRepository, InMemoryPasswordResetRepository, InMemoryUserRepository,
    PostgresAccessControlRepository, PostgresPasswordResetRepository, PostgresUserRepository,
};

pub(super) struct RepositorySet {
    pub(super) permission_repository: Arc<dyn PermissionRepository>,
    pub(super) role_repository: Arc<dyn RoleRepository>,
    pub(super) user_role_repository: Arc<dyn UserRoleRepository>,
    pub(super) password_reset_repository: Arc<dyn PasswordResetRepository>,
    pub(super) user_repository: Arc<dyn UserRepository>,
}

pub(super) fn build_postgres_repository_set(pool: &PgPool) -> RepositorySet {
    let access_control = Arc::new(PostgresAccessControlRepository::new(pool.clone()));

    RepositorySet {
        permission_repository: access_control.clone(),
        role_repository: access_control.clone(),
        user_role_repository: access_control,
        password_reset_repository: Arc::new(PostgresPasswordResetRepository::new(pool.clone())),
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
    }
}

pub(super) async fn build_memory_repository_set(
    seed_user_emails: &[String],
    default_language: &str,
) -> AppResult<RepositorySet> {
    let access_control = Arc::new(InMemoryAccessControlRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());

    for email in seed_user_emails {
        let account = UserAccount {
            id: UserId::new(),
            email: EmailAddress::new(email.as_str())?,
            language_tag: default_language.to_owned(),
        };
        let user_id = account.id;
        users.insert_user(account).await?;
        info!(user_id = %user_id, email = %email, "seeded in-memory user");
    }

    Ok(RepositorySet {
        permission_repository: access_control.clone(),
        role_repository: access_control.clone(),
        user_role_repository: access_control,
        password_reset_repository: Arc::new(InMemoryPasswordResetRepository::new()),
        user_repository: users,
    })
}
