//! Application use-cases and ports.

#![forbid(unsafe_code)]

mod access_control_ports;
mod authorization_service;
mod broker_link_service;
mod clock;
mod deadline;
mod notification_ports;
mod password_recovery_service;
mod password_reset_service;
mod permission_service;
mod role_service;
mod user_ports;
mod user_role_service;

#[cfg(test)]
mod test_support;

pub use access_control_ports::{
    AccessControlLimits, PermissionRepository, RoleRecord, RoleRepository, UserRoleRepository,
};
pub use authorization_service::AuthorizationService;
pub use broker_link_service::{BrokerLinkService, BrokerUserGateway, TransactionGateway};
pub use clock::{Clock, SystemClock};
pub use deadline::with_deadline;
pub use notification_ports::{
    EmailAttachment, EmailMessage, EmailService, Localization, Localizer, render_message,
};
pub use password_recovery_service::{
    PasswordRecoveryService, RESET_BODY_KEY, RESET_SUBJECT_KEY,
};
pub use password_reset_service::{
    DEFAULT_PASSWORD_RESET_TTL_MINUTES, IssuedPasswordReset, PasswordResetRepository,
    PasswordResetService,
};
pub use permission_service::{PermissionInput, PermissionService};
pub use role_service::{CreateRoleInput, RoleService, UpdateRoleInput};
pub use user_ports::{PasswordHasher, UserRepository};
pub use user_role_service::UserRoleService;
