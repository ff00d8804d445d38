use chrono::{DateTime, Utc};

use crate::{ResetRequestId, UserId};

/// Stored password reset request.
///
/// Presence in the store is the only "pending" marker: consuming a request
/// deletes it. Expiry is computed on read by comparing `expires_at` with the
/// current time and is never persisted as a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    id: ResetRequestId,
    user_id: UserId,
    token_hash: String,
    expires_at: DateTime<Utc>,
}

impl PasswordResetRequest {
    /// Creates a request record.
    #[must_use]
    pub fn new(
        id: ResetRequestId,
        user_id: UserId,
        token_hash: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            token_hash: token_hash.into(),
            expires_at,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> ResetRequestId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the SHA-256 hash of the secondary secret.
    #[must_use]
    pub fn token_hash(&self) -> &str {
        self.token_hash.as_str()
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the request is still usable at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
