//! End-to-end password recovery flow built on the reset request lifecycle.

use std::sync::Arc;

use tracing::{error, info, warn};

use warden_core::{AppError, AppResult};
use warden_domain::{EmailAddress, ResetRequestId, UserAccount, validate_password};

use crate::{
    EmailMessage, EmailService, IssuedPasswordReset, Localization, PasswordHasher,
    PasswordResetService, UserRepository, render_message,
};


/// Localization key of the reset email subject.
pub const RESET_SUBJECT_KEY: &str = "password_reset.subject";

/// Localization key of the reset email body. Placeholders: `{link}`, `{expires_at}`.
pub const RESET_BODY_KEY: &str = "password_reset.body";

/// Application service orchestrating reset requests, notifications and the
/// final password change.
#[derive(Clone)]
pub struct PasswordRecoveryService {
    reset_service: PasswordResetService,
    user_repository: Arc<dyn UserRepository>,
    email_service: Arc<dyn EmailService>,
    localization: Arc<dyn Localization>,
    password_hasher: Arc<dyn PasswordHasher>,
    frontend_url: String,
}

impl PasswordRecoveryService {
    /// Creates a new password recovery service.
    #[must_use]
    pub fn new(
        reset_service: PasswordResetService,
        user_repository: Arc<dyn UserRepository>,
        email_service: Arc<dyn EmailService>,
        localization: Arc<dyn Localization>,
        password_hasher: Arc<dyn PasswordHasher>,
        frontend_url: String,
    ) -> Self {
        Self {
            reset_service,
            user_repository,
            email_service,
            localization,
            password_hasher,
            frontend_url,
        }
    }

    /// Starts a password reset for the account behind `email`.
    ///
    /// Returns `Ok(())` for unknown or malformed addresses and when a valid
    /// request already exists, so the response never reveals whether the
    /// address is registered. When the notification cannot be rendered or
    /// sent, the new request is deleted again and the error is returned.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let Ok(email) = EmailAddress::new(email) else {
            return Ok(());
        };

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            return Ok(());
        };

        if self.reset_service.valid_for_user(user.id).await? {
            info!(user_id = %user.id, "password reset already pending, not issuing another");
            return Ok(());
        }

        let issued = match self.reset_service.create(user.id).await {
            Ok(issued) => issued,
            // Lost a race with a concurrent request for the same user.
            Err(AppError::Conflict(_)) => return Ok(()),
            Err(error) => return Err(error),
        };

        if let Err(error) = self.send_reset_notification(&user, &issued).await {
            self.discard_request(issued.request.id()).await;
            return Err(error);
        }

        Ok(())
    }

    /// Resolves a reset link, failing with `NotFound` when it is unusable.
    pub async fn verify_reset_link(
        &self,
        request_id: ResetRequestId,
        token: &str,
    ) -> AppResult<ResetRequestId> {
        self.reset_service
            .get_request_id(request_id, token)
            .await?
            .ok_or_else(invalid_link_error)
    }

    /// Applies a new password through a reset link and consumes the request.
    ///
    /// The password change is not rolled back when the final delete fails;
    /// that failure is reported as `Internal`.
    pub async fn complete_password_reset(
        &self,
        request_id: ResetRequestId,
        token: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validate_password(new_password)?;

        let request = self
            .reset_service
            .find_valid_request(request_id, token)
            .await?
            .ok_or_else(invalid_link_error)?;
        let user_id = request.user_id();

        let password_hash = self.password_hasher.hash_password(new_password)?;

        if !self.reset_service.valid(request_id, user_id).await? {
            return Err(invalid_link_error());
        }

        self.user_repository
            .update_password_hash(user_id, &password_hash)
            .await?;
        info!(user_id = %user_id, "password changed through reset request");

        self.reset_service
            .delete(request_id)
            .await
            .map_err(|delete_error| {
                error!(
                    user_id = %user_id,
                    request_id = %request_id,
                    error = %delete_error,
                    "password changed but reset request could not be deleted"
                );
                AppError::Internal(format!(
                    "password was changed but reset request '{request_id}' could not be deleted: {delete_error}"
                ))
            })
    }

    async fn send_reset_notification(
        &self,
        user: &UserAccount,
        issued: &IssuedPasswordReset,
    ) -> AppResult<()> {
        let localizer = self.localization.localizer(&user.language_tag)?;

        let link = format!(
            "{}/reset-password?id={}&token={}",
            self.frontend_url.trim_end_matches('/'),
            issued.request.id(),
            issued.token
        );
        let expires_at = issued.request.expires_at().to_rfc3339();

        let message = EmailMessage {
            to: user.email.as_str().to_owned(),
            subject: localizer.message(RESET_SUBJECT_KEY),
            text_body: render_message(
                &localizer.message(RESET_BODY_KEY),
                &[("link", link.as_str()), ("expires_at", expires_at.as_str())],
            ),
            attachments: Vec::new(),
        };

        self.email_service.send_email(&message).await
    }

    async fn discard_request(&self, request_id: ResetRequestId) {
        if let Err(delete_error) = self.reset_service.delete(request_id).await {
            warn!(
                request_id = %request_id,
                error = %delete_error,
                "failed to delete password reset request after notification failure"
            );
        }
    }
}

fn invalid_link_error() -> AppError {
    AppError::NotFound("password reset request is invalid or expired".to_owned())
}
