use super::*;

pub async fn list_role_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<Json<UserIdsPayload>> {
    require(&state, principal, SystemPermission::UserRolesManage).await?;

    let user_ids = state.user_role_service.list_users_for_role(role_id).await?;

    Ok(Json(UserIdsPayload { user_ids }))
}

pub async fn add_role_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<UserIdsPayload>,
) -> ApiResult<Json<UserIdsPayload>> {
    require(&state, principal, SystemPermission::UserRolesManage).await?;

    let user_ids = state
        .user_role_service
        .add_users_to_role(role_id, &payload.user_ids)
        .await?;

    Ok(Json(UserIdsPayload { user_ids }))
}

pub async fn remove_role_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<UserIdsPayload>,
) -> ApiResult<Json<UserIdsPayload>> {
    require(&state, principal, SystemPermission::UserRolesManage).await?;

    let user_ids = state
        .user_role_service
        .remove_users_from_role(role_id, &payload.user_ids)
        .await?;

    Ok(Json(UserIdsPayload { user_ids }))
}

/// Users may always read their own roles; reading anyone else's needs the
/// assignment capability.
pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    if principal.user_id != user_id {
        require(&state, principal, SystemPermission::UserRolesManage).await?;
    }

    let roles = state
        .user_role_service
        .list_roles_with_permissions_for_user(user_id)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn set_user_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<SetUserRolesRequest>,
) -> ApiResult<StatusCode> {
    require(&state, principal, SystemPermission::UserRolesManage).await?;

    state
        .user_role_service
        .set_roles_for_user(user_id, &payload.role_ids)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
