use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    let roles = state
        .role_service
        .list_roles_with_permissions()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    let role = state.role_service.create_role(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<Json<RoleResponse>> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    let role = state
        .role_service
        .get_role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    let role = state
        .role_service
        .update_role(role_id, payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<StatusCode> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    state.role_service.delete_role(role_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    let permissions = state
        .permission_service
        .list_permissions_for_role(role_id)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn set_role_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<SetRolePermissionsRequest>,
) -> ApiResult<StatusCode> {
    require(&state, principal, SystemPermission::RolesManage).await?;

    state
        .role_service
        .set_role_permissions(role_id, &payload.permission_ids)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
