use serde::{Deserialize, Serialize};
use warden_application::{CreateRoleInput, PermissionInput, UpdateRoleInput};
use warden_core::AppError;
use warden_domain::{
    Permission, PermissionId, PermissionScope, ResetRequestId, RoleId, RoleWithPermissions,
    UserId,
};

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for permission create and update.
#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    pub value: String,
    pub scope: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<PermissionRequest> for PermissionInput {
    type Error = AppError;

    fn try_from(value: PermissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            value: value.value,
            scope: PermissionScope::from_transport(value.scope.as_str())?,
            description: value.description,
        })
    }
}

/// Permission payload.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: PermissionId,
    pub value: String,
    pub scope: String,
    pub description: String,
}

impl From<&Permission> for PermissionResponse {
    fn from(value: &Permission) -> Self {
        Self {
            id: value.id(),
            value: value.value().to_owned(),
            scope: value.scope().as_str().to_owned(),
            description: value.description().to_owned(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self::from(&value)
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            permission_ids: value.permission_ids,
        }
    }
}

/// Incoming payload for role updates. Omitting `permission_ids` keeps the
/// current permission set.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    pub permission_ids: Option<Vec<PermissionId>>,
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            name: value.name,
            permission_ids: value.permission_ids,
        }
    }
}

/// Role payload with its resolved permissions.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<PermissionResponse>,
}

impl From<&RoleWithPermissions> for RoleResponse {
    fn from(value: &RoleWithPermissions) -> Self {
        Self {
            id: value.role().id(),
            name: value.role().name().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

impl From<RoleWithPermissions> for RoleResponse {
    fn from(value: RoleWithPermissions) -> Self {
        Self::from(&value)
    }
}

/// Full replacement of a role's permission set.
#[derive(Debug, Deserialize)]
pub struct SetRolePermissionsRequest {
    pub permission_ids: Vec<PermissionId>,
}

/// Batch of users for role membership changes.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserIdsPayload {
    pub user_ids: Vec<UserId>,
}

/// Full replacement of a user's roles.
#[derive(Debug, Deserialize)]
pub struct SetUserRolesRequest {
    pub role_ids: Vec<RoleId>,
}

/// Starts a password reset.
#[derive(Debug, Deserialize)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

/// Checks a reset link before the new password is entered.
#[derive(Debug, Deserialize)]
pub struct VerifyPasswordResetRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifiedPasswordResetResponse {
    pub request_id: ResetRequestId,
}

/// Completes a password reset.
#[derive(Debug, Deserialize)]
pub struct CompletePasswordResetRequest {
    pub token: String,
    pub new_password: String,
}
