//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod catalog_localization;
mod console_email_service;
mod http_service_gateways;
mod in_memory_access_control_repository;
mod in_memory_password_reset_repository;
mod in_memory_user_repository;
mod postgres_access_control_repository;
mod postgres_password_reset_repository;
mod postgres_user_repository;
mod smtp_email_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use catalog_localization::CatalogLocalization;
pub use console_email_service::ConsoleEmailService;
pub use http_service_gateways::{HttpBrokerUserGateway, HttpTransactionGateway};
pub use in_memory_access_control_repository::InMemoryAccessControlRepository;
pub use in_memory_password_reset_repository::InMemoryPasswordResetRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_access_control_repository::PostgresAccessControlRepository;
pub use postgres_password_reset_repository::PostgresPasswordResetRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
