use std::sync::Arc;

use warden_application::{
    AuthorizationService, BrokerLinkService, PasswordRecoveryService, PasswordResetService,
    PermissionService, RoleService, SystemClock, UserRoleService,
};
use warden_core::AppError;
use warden_infrastructure::{Argon2PasswordHasher, CatalogLocalization};

use crate::api_config::{ApiConfig, StorageConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;
use super::email::build_email_service;

mod remotes;
mod repositories;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let repositories = match &config.storage {
        StorageConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            repositories::build_postgres_repository_set(&pool)
        }
        StorageConfig::Memory { seed_user_emails } => {
            repositories::build_memory_repository_set(seed_user_emails, &config.default_language)
                .await?
        }
    };

    let role_service = RoleService::new(
        repositories.role_repository.clone(),
        repositories.permission_repository.clone(),
        config.limits,
    );
    let user_role_service = UserRoleService::new(
        repositories.user_role_repository.clone(),
        repositories.role_repository.clone(),
        role_service.clone(),
        config.limits,
    );

    let ttl = chrono::Duration::try_minutes(config.password_reset_ttl_minutes).ok_or_else(|| {
        AppError::Validation("PASSWORD_RESET_TTL_MINUTES is out of range".to_owned())
    })?;
    let password_reset_service = PasswordResetService::new(
        repositories.password_reset_repository.clone(),
        Arc::new(SystemClock),
        ttl,
    );

    let (broker_gateway, transaction_gateway) = remotes::build_remote_gateways(config)?;

    Ok(AppState {
        permission_service: PermissionService::new(
            repositories.permission_repository.clone(),
            repositories.role_repository.clone(),
        ),
        role_service,
        authorization_service: AuthorizationService::new(user_role_service.clone()),
        user_role_service,
        password_recovery_service: PasswordRecoveryService::new(
            password_reset_service,
            repositories.user_repository.clone(),
            build_email_service(config),
            Arc::new(CatalogLocalization::bundled(&config.default_language)?),
            Arc::new(Argon2PasswordHasher::new()),
            config.frontend_url.clone(),
        ),
        broker_link_service: BrokerLinkService::new(
            broker_gateway,
            transaction_gateway,
            config.remote_call_timeout,
        ),
    })
}
