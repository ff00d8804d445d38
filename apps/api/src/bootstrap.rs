use tracing::info;
use warden_application::{CreateRoleInput, PermissionInput};
use warden_core::AppResult;
use warden_domain::{PermissionId, RoleId, SystemPermission, UserId};

use crate::state::AppState;

/// Name of the role holding every system permission.
pub const ADMINISTRATOR_ROLE_NAME: &str = "administrator";

/// Grants `user_id` every system permission through the administrator role,
/// creating missing catalog entries and the role on first run.
pub async fn ensure_administrator(state: &AppState, user_id: UserId) -> AppResult<RoleId> {
    let permission_ids = ensure_system_permissions(state).await?;

    let existing = state
        .role_service
        .list_roles_with_permissions()
        .await?
        .into_iter()
        .find(|role| role.role().name() == ADMINISTRATOR_ROLE_NAME);

    let role_id = match existing {
        Some(role) => {
            let role_id = role.role().id();
            state
                .role_service
                .set_role_permissions(role_id, &permission_ids)
                .await?;
            role_id
        }
        None => {
            state
                .role_service
                .create_role(CreateRoleInput {
                    name: ADMINISTRATOR_ROLE_NAME.to_owned(),
                    permission_ids,
                })
                .await?
                .role()
                .id()
        }
    };

    state
        .user_role_service
        .add_users_to_role(role_id, &[user_id])
        .await?;

    info!(user_id = %user_id, role_id = %role_id, "bootstrapped administrator");
    Ok(role_id)
}

async fn ensure_system_permissions(state: &AppState) -> AppResult<Vec<PermissionId>> {
    let catalog = state.permission_service.list_permissions().await?;
    let mut permission_ids = Vec::with_capacity(SystemPermission::all().len());

    for system_permission in SystemPermission::all() {
        let existing = catalog
            .iter()
            .find(|permission| permission.value() == system_permission.as_str());

        let permission_id = match existing {
            Some(permission) => permission.id(),
            None => state
                .permission_service
                .create_permission(PermissionInput {
                    value: system_permission.as_str().to_owned(),
                    scope: system_permission.scope(),
                    description: String::new(),
                })
                .await?
                .id(),
        };
        permission_ids.push(permission_id);
    }

    Ok(permission_ids)
}
