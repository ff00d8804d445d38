//! Warden API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod bootstrap;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use tokio::net::TcpListener;
use tracing::info;
use warden_core::AppError;

use crate::api_config::{ApiConfig, StorageConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        if let StorageConfig::Postgres { database_url } = &config.storage {
            api_services::connect_and_migrate(database_url).await?;
        }
        info!("database migrations applied");
        return Ok(());
    }

    let app_state = api_services::build_app_state(&config).await?;

    if let Some(user_id) = config.bootstrap_admin_user_id {
        bootstrap::ensure_administrator(&app_state, user_id).await?;
    }

    let app = api_router::build_router(app_state, &config.frontend_url, config.request_timeout)?;

    let address = config.socket_address()?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "warden api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
