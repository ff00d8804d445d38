use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    require(&state, principal, SystemPermission::PermissionsManage).await?;

    let permissions = state
        .permission_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    require(&state, principal, SystemPermission::PermissionsManage).await?;

    let permission = state
        .permission_service
        .create_permission(payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(permission_id): Path<PermissionId>,
) -> ApiResult<Json<PermissionResponse>> {
    require(&state, principal, SystemPermission::PermissionsManage).await?;

    let permission = state
        .permission_service
        .get_permission(permission_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("permission '{permission_id}' does not exist"))
        })?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(permission_id): Path<PermissionId>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    require(&state, principal, SystemPermission::PermissionsManage).await?;

    let permission = state
        .permission_service
        .update_permission(permission_id, payload.try_into()?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(permission_id): Path<PermissionId>,
) -> ApiResult<StatusCode> {
    require(&state, principal, SystemPermission::PermissionsManage).await?;

    state
        .permission_service
        .delete_permission(permission_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
