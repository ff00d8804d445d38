use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warden_core::AppError;

/// Audience a permission is declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// Administrative capabilities of back-office operators.
    Admin,
    /// Capabilities of end users acting on their own resources.
    User,
    /// Capabilities granted to internal services.
    Service,
}

impl PermissionScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Service => "service",
        }
    }

    /// Returns all declared scopes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionScope] = &[
            PermissionScope::Admin,
            PermissionScope::User,
            PermissionScope::Service,
        ];

        ALL
    }

    /// Parses a transport value into a scope.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for PermissionScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "service" => Ok(Self::Service),
            _ => Err(AppError::Validation(format!(
                "unknown permission scope '{value}'"
            ))),
        }
    }
}

/// Capabilities that guard this subsystem's own administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemPermission {
    /// Allows managing the permission catalog.
    PermissionsManage,
    /// Allows managing roles and their permission sets.
    RolesManage,
    /// Allows managing user-role assignments.
    UserRolesManage,
    /// Allows removing a broker link together with its transactions.
    BrokerLinksDelete,
}

impl SystemPermission {
    /// Returns the capability value checked against resolved roles.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionsManage => "admin.permissions.manage",
            Self::RolesManage => "admin.roles.manage",
            Self::UserRolesManage => "admin.user_roles.manage",
            Self::BrokerLinksDelete => "user.broker_links.delete",
        }
    }

    /// Returns the scope the capability is declared under.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        match self {
            Self::PermissionsManage | Self::RolesManage | Self::UserRolesManage => {
                PermissionScope::Admin
            }
            Self::BrokerLinksDelete => PermissionScope::User,
        }
    }

    /// Returns all system permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemPermission] = &[
            SystemPermission::PermissionsManage,
            SystemPermission::RolesManage,
            SystemPermission::UserRolesManage,
            SystemPermission::BrokerLinksDelete,
        ];

        ALL
    }
}
