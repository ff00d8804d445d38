use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use warden_core::AppError;
use warden_domain::{BrokerId, SystemPermission, UserId};

use crate::error::ApiResult;
use crate::middleware::Principal;
use crate::state::AppState;

/// Removes one of the caller's broker links together with its transactions.
pub async fn delete_broker_link_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, broker_id)): Path<(UserId, BrokerId)>,
) -> ApiResult<StatusCode> {
    if principal.user_id != user_id {
        return Err(AppError::Forbidden(format!(
            "user '{}' cannot remove broker links of user '{user_id}'",
            principal.user_id
        ))
        .into());
    }

    state
        .authorization_service
        .require_permission(principal.user_id, SystemPermission::BrokerLinksDelete)
        .await?;

    state
        .broker_link_service
        .delete_broker_link_and_dependents(user_id, broker_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
