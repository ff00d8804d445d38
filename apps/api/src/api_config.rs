use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use warden_application::{AccessControlLimits, DEFAULT_PASSWORD_RESET_TTL_MINUTES};
use warden_core::AppError;
use warden_domain::{DEFAULT_MAX_PERMISSIONS_PER_ROLE, SystemPermission, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailProviderConfig {
    Console,
    Smtp(SmtpRuntimeConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local storage. Accounts listed in `SEED_USER_EMAILS` are created at startup.
    Memory { seed_user_emails: Vec<String> },
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageConfig,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub limits: AccessControlLimits,
    pub password_reset_ttl_minutes: i64,
    pub request_timeout: Duration,
    pub remote_call_timeout: Duration,
    pub broker_service_url: String,
    pub transaction_service_url: String,
    pub email_provider: EmailProviderConfig,
    pub default_language: String,
    /// User granted every system permission at startup, if set.
    pub bootstrap_admin_user_id: Option<UserId>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match or_default(&lookup, "STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
            },
            "memory" => StorageConfig::Memory {
                seed_user_emails: or_default(&lookup, "SEED_USER_EMAILS", "")
                    .split(',')
                    .map(str::trim)
                    .filter(|email| !email.is_empty())
                    .map(ToOwned::to_owned)
                    .collect(),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && !matches!(storage, StorageConfig::Postgres { .. }) {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        let max_batch = parse_positive(&lookup, "ASSIGNMENT_MAX_BATCH", 500_usize)?;
        let limits = AccessControlLimits {
            max_permissions_per_role: parse_positive(
                &lookup,
                "ROLE_MAX_PERMISSIONS",
                DEFAULT_MAX_PERMISSIONS_PER_ROLE,
            )?,
            max_users_per_batch: max_batch,
            max_roles_per_user: max_batch,
        };

        let email_provider = match or_default(&lookup, "EMAIL_PROVIDER", "console").as_str() {
            "console" => EmailProviderConfig::Console,
            "smtp" => {
                let port = required_non_empty(&lookup, "SMTP_PORT")?
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;
                EmailProviderConfig::Smtp(SmtpRuntimeConfig {
                    host: required_non_empty(&lookup, "SMTP_HOST")?,
                    port,
                    username: required_non_empty(&lookup, "SMTP_USERNAME")?,
                    password: required_non_empty(&lookup, "SMTP_PASSWORD")?,
                    from_address: required_non_empty(&lookup, "SMTP_FROM_ADDRESS")?,
                })
            }
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{other}'"
                )));
            }
        };

        // The cascade endpoints are useless without both services, but a
        // migrate-only run never reaches them.
        let (broker_service_url, transaction_service_url) = if migrate_only {
            (String::new(), String::new())
        } else {
            (
                required_non_empty(&lookup, "BROKER_SERVICE_URL")?,
                required_non_empty(&lookup, "TRANSACTION_SERVICE_URL")?,
            )
        };

        let bootstrap_admin_user_id = lookup("BOOTSTRAP_ADMIN_USER_ID")
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse::<UserId>())
            .transpose()?;

        let system_permission_count = SystemPermission::all().len();
        if bootstrap_admin_user_id.is_some()
            && limits.max_permissions_per_role < system_permission_count
        {
            return Err(AppError::Validation(format!(
                "BOOTSTRAP_ADMIN_USER_ID needs ROLE_MAX_PERMISSIONS of at least {system_permission_count} to hold every system permission, got {}",
                limits.max_permissions_per_role
            )));
        }

        Ok(Self {
            migrate_only,
            storage,
            api_host: or_default(&lookup, "API_HOST", "127.0.0.1"),
            api_port: parse_positive(&lookup, "API_PORT", 3001_u16)?,
            frontend_url: or_default(&lookup, "FRONTEND_URL", "http://localhost:3000"),
            limits,
            password_reset_ttl_minutes: parse_positive(
                &lookup,
                "PASSWORD_RESET_TTL_MINUTES",
                DEFAULT_PASSWORD_RESET_TTL_MINUTES,
            )?,
            request_timeout: Duration::from_millis(parse_positive(
                &lookup,
                "REQUEST_TIMEOUT_MS",
                15_000_u64,
            )?),
            remote_call_timeout: Duration::from_millis(parse_positive(
                &lookup,
                "REMOTE_CALL_TIMEOUT_MS",
                5_000_u64,
            )?),
            broker_service_url,
            transaction_service_url,
            email_provider,
            default_language: or_default(&lookup, "DEFAULT_LANGUAGE", "en"),
            bootstrap_admin_user_id,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn required_non_empty<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_positive<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(name).filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|error| AppError::Validation(format!("invalid {name} '{raw}': {error}")))?;
    if value <= T::default() {
        return Err(AppError::Validation(format!("{name} must be positive")));
    }

    Ok(value)
}
