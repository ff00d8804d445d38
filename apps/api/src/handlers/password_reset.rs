use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use warden_domain::ResetRequestId;

use crate::dto::{
    CompletePasswordResetRequest, RequestPasswordResetRequest, VerifiedPasswordResetResponse,
    VerifyPasswordResetRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Always accepted, whether or not the address belongs to an account.
pub async fn request_password_reset_handler(
    State(state): State<AppState>,
    Json(payload): Json<RequestPasswordResetRequest>,
) -> ApiResult<StatusCode> {
    state
        .password_recovery_service
        .request_password_reset(payload.email.as_str())
        .await?;

    Ok(StatusCode::ACCEPTED)
}

pub async fn verify_password_reset_handler(
    State(state): State<AppState>,
    Path(request_id): Path<ResetRequestId>,
    Json(payload): Json<VerifyPasswordResetRequest>,
) -> ApiResult<Json<VerifiedPasswordResetResponse>> {
    let request_id = state
        .password_recovery_service
        .verify_reset_link(request_id, payload.token.as_str())
        .await?;

    Ok(Json(VerifiedPasswordResetResponse { request_id }))
}

pub async fn complete_password_reset_handler(
    State(state): State<AppState>,
    Path(request_id): Path<ResetRequestId>,
    Json(payload): Json<CompletePasswordResetRequest>,
) -> ApiResult<StatusCode> {
    state
        .password_recovery_service
        .complete_password_reset(
            request_id,
            payload.token.as_str(),
            payload.new_password.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
