//! Password reset request lifecycle.
//!
//! A request moves from absent to pending and ends either consumed (deleted)
//! or expired. Expiry is never stored; it is computed on every read. Expired
//! rows stay in the store until the next `create` for the same user
//! supersedes them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{PasswordResetRequest, ResetRequestId, UserId};

use crate::Clock;

mod token_crypto;

#[cfg(test)]
mod tests;

/// Default lifetime of a password reset request, in minutes.
pub const DEFAULT_PASSWORD_RESET_TTL_MINUTES: i64 = 60;

/// Repository port for password reset requests.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Stores a new request.
    ///
    /// Fails with `Conflict` when the user already has a stored request. This
    /// uniqueness rule is what serializes concurrent creations.
    async fn create_request(&self, request: &PasswordResetRequest) -> AppResult<()>;

    /// Finds a request by id, expired or not.
    async fn find_request(
        &self,
        request_id: ResetRequestId,
    ) -> AppResult<Option<PasswordResetRequest>>;

    /// Finds the request stored for a user, expired or not.
    async fn find_request_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PasswordResetRequest>>;

    /// Deletes a request. Deleting an absent request succeeds.
    async fn delete_request(&self, request_id: ResetRequestId) -> AppResult<()>;
}

/// Freshly created request together with its one-time secret.
///
/// The raw token exists only here; the store keeps its hash.
#[derive(Debug, Clone)]
pub struct IssuedPasswordReset {
    /// Stored request.
    pub request: PasswordResetRequest,
    /// Raw secret to embed in the reset link.
    pub token: String,
}

/// Application service owning the reset request state machine.
#[derive(Clone)]
pub struct PasswordResetService {
    repository: Arc<dyn PasswordResetRepository>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl PasswordResetService {
    /// Creates a new password reset service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PasswordResetRepository>,
        clock: Arc<dyn Clock>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            ttl,
        }
    }

    /// Returns whether the user has a non-expired request.
    pub async fn valid_for_user(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.pending_request_for_user(user_id).await?.is_some())
    }

    /// Creates a request for the user.
    ///
    /// Fails with `Conflict` while a valid request exists so that a link
    /// already sent to the user is never invalidated. An expired request is
    /// superseded and deleted first.
    pub async fn create(&self, user_id: UserId) -> AppResult<IssuedPasswordReset> {
        let now = self.clock.now();

        if let Some(existing) = self.repository.find_request_for_user(user_id).await? {
            if existing.is_valid_at(now) {
                return Err(AppError::Conflict(format!(
                    "user '{user_id}' already has a pending password reset request"
                )));
            }

            self.repository.delete_request(existing.id()).await?;
            info!(
                user_id = %user_id,
                request_id = %existing.id(),
                "superseded expired password reset request"
            );
        }

        let (token, token_hash) = token_crypto::generate_token()?;
        let request =
            PasswordResetRequest::new(ResetRequestId::new(), user_id, token_hash, now + self.ttl);

        self.repository.create_request(&request).await?;

        info!(
            user_id = %user_id,
            request_id = %request.id(),
            expires_at = %request.expires_at(),
            "created password reset request"
        );
        Ok(IssuedPasswordReset { request, token })
    }

    /// Returns the expiry of the user's valid request.
    pub async fn get_expires_at(&self, user_id: UserId) -> AppResult<DateTime<Utc>> {
        self.pending_request_for_user(user_id)
            .await?
            .map(|request| request.expires_at())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user '{user_id}' has no pending password reset request"
                ))
            })
    }

    /// Resolves a reset link to its request id.
    ///
    /// Returns `None` when the id is unknown, the token does not match or the
    /// request has expired.
    pub async fn get_request_id(
        &self,
        request_id: ResetRequestId,
        token: &str,
    ) -> AppResult<Option<ResetRequestId>> {
        Ok(self
            .find_valid_request(request_id, token)
            .await?
            .map(|request| request.id()))
    }

    /// Resolves a reset link to the full request record.
    pub async fn find_valid_request(
        &self,
        request_id: ResetRequestId,
        token: &str,
    ) -> AppResult<Option<PasswordResetRequest>> {
        let now = self.clock.now();

        Ok(self
            .repository
            .find_request(request_id)
            .await?
            .filter(|request| {
                request.is_valid_at(now)
                    && token_crypto::token_matches(token, request.token_hash())
            }))
    }

    /// Checks existence, ownership and expiry right before a password change.
    pub async fn valid(&self, request_id: ResetRequestId, user_id: UserId) -> AppResult<bool> {
        let now = self.clock.now();

        Ok(self
            .repository
            .find_request(request_id)
            .await?
            .is_some_and(|request| request.user_id() == user_id && request.is_valid_at(now)))
    }

    /// Deletes a request. Deleting an absent request succeeds.
    pub async fn delete(&self, request_id: ResetRequestId) -> AppResult<()> {
        self.repository.delete_request(request_id).await?;

        info!(request_id = %request_id, "deleted password reset request");
        Ok(())
    }

    async fn pending_request_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        let now = self.clock.now();

        Ok(self
            .repository
            .find_request_for_user(user_id)
            .await?
            .filter(|request| request.is_valid_at(now)))
    }
}
