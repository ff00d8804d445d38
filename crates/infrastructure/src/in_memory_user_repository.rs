use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_application::UserRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{EmailAddress, UserAccount, UserId};

#[derive(Debug, Clone)]
struct StoredUser {
    account: UserAccount,
    password_hash: Option<String>,
}

/// In-memory user store for the memory storage backend and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, StoredUser>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account. Fails with `Conflict` when the email is taken.
    pub async fn insert_user(&self, account: UserAccount) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|stored| stored.account.email == account.email)
        {
            return Err(AppError::Conflict(format!(
                "user with email '{}' already exists",
                account.email.as_str()
            )));
        }

        users.insert(
            account.id,
            StoredUser {
                account,
                password_hash: None,
            },
        );
        Ok(())
    }

    /// Returns the stored password hash of a user.
    pub async fn password_hash(&self, user_id: UserId) -> Option<String> {
        self.users
            .read()
            .await
            .get(&user_id)
            .and_then(|stored| stored.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserAccount>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|stored| stored.account.email == *email)
            .map(|stored| stored.account.clone()))
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        stored.password_hash = Some(password_hash.to_owned());
        Ok(())
    }
}
