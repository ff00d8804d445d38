//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authorization;
mod ids;
mod password_reset;
mod permission;
mod role;
mod security;
mod user;

pub use authorization::check_permission;
pub use ids::{BrokerId, PermissionId, ResetRequestId, RoleId, UserId, dedupe_preserving_order};
pub use password_reset::PasswordResetRequest;
pub use permission::Permission;
pub use role::{
    DEFAULT_MAX_PERMISSIONS_PER_ROLE, Role, RoleWithPermissions, ensure_permission_count,
};
pub use security::{PermissionScope, SystemPermission};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserAccount, validate_password,
};
