//! Ports onto the user service's account data.

use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{EmailAddress, UserAccount, UserId};

/// Repository port for the user accounts touched by password recovery.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserAccount>>;

    /// Stores a new password hash. Fails with `NotFound` when the user is gone.
    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;
}

/// Port for password hashing. Infrastructure provides Argon2id.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;
}
