use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use warden_core::AppError;
use warden_domain::{PermissionId, RoleId, SystemPermission, UserId};

use crate::dto::{
    CreateRoleRequest, PermissionRequest, PermissionResponse, RoleResponse,
    SetRolePermissionsRequest, SetUserRolesRequest, UpdateRoleRequest, UserIdsPayload,
};
use crate::error::ApiResult;
use crate::middleware::Principal;
use crate::state::AppState;

mod permissions;
mod roles;
mod user_roles;

pub use permissions::{
    create_permission_handler, delete_permission_handler, get_permission_handler,
    list_permissions_handler, update_permission_handler,
};
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_role_permissions_handler,
    list_roles_handler, set_role_permissions_handler, update_role_handler,
};
pub use user_roles::{
    add_role_users_handler, list_role_users_handler, list_user_roles_handler,
    remove_role_users_handler, set_user_roles_handler,
};

async fn require(
    state: &AppState,
    principal: Principal,
    permission: SystemPermission,
) -> ApiResult<()> {
    state
        .authorization_service
        .require_permission(principal.user_id, permission)
        .await?;
    Ok(())
}
