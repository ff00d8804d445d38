use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_application::PasswordResetRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{PasswordResetRequest, ResetRequestId, UserId};

/// In-memory password reset request store.
///
/// Requests are indexed by id and by user. The user index enforces the
/// one-request-per-user rule under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryPasswordResetRepository {
    requests: RwLock<ResetTables>,
}

#[derive(Debug, Default)]
struct ResetTables {
    by_id: HashMap<ResetRequestId, PasswordResetRequest>,
    by_user: HashMap<UserId, ResetRequestId>,
}

impl InMemoryPasswordResetRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn create_request(&self, request: &PasswordResetRequest) -> AppResult<()> {
        let mut tables = self.requests.write().await;

        if tables.by_user.contains_key(&request.user_id()) {
            return Err(AppError::Conflict(format!(
                "user '{}' already has a stored password reset request",
                request.user_id()
            )));
        }

        tables.by_user.insert(request.user_id(), request.id());
        tables.by_id.insert(request.id(), request.clone());
        Ok(())
    }

    async fn find_request(
        &self,
        request_id: ResetRequestId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        Ok(self.requests.read().await.by_id.get(&request_id).cloned())
    }

    async fn find_request_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PasswordResetRequest>> {
        let tables = self.requests.read().await;

        Ok(tables
            .by_user
            .get(&user_id)
            .and_then(|request_id| tables.by_id.get(request_id))
            .cloned())
    }

    async fn delete_request(&self, request_id: ResetRequestId) -> AppResult<()> {
        let mut tables = self.requests.write().await;

        if let Some(removed) = tables.by_id.remove(&request_id) {
            tables.by_user.remove(&removed.user_id());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use warden_application::PasswordResetRepository;
    use warden_core::{AppError, AppResult};
    use warden_domain::{PasswordResetRequest, ResetRequestId, UserId};

    use super::InMemoryPasswordResetRepository;

    fn request(user_id: UserId) -> PasswordResetRequest {
        PasswordResetRequest::new(
            ResetRequestId::new(),
            user_id,
            "ab".repeat(32),
            Utc::now() + Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn second_request_for_user_conflicts() -> AppResult<()> {
        let repository = InMemoryPasswordResetRepository::new();
        let user_id = UserId::new();
        let first = request(user_id);
        repository.create_request(&first).await?;

        let result = repository.create_request(&request(user_id)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repository.find_request_for_user(user_id).await?, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn delete_frees_the_user_slot_and_is_idempotent() -> AppResult<()> {
        let repository = InMemoryPasswordResetRepository::new();
        let user_id = UserId::new();
        let first = request(user_id);
        repository.create_request(&first).await?;

        repository.delete_request(first.id()).await?;
        repository.delete_request(first.id()).await?;
        repository.create_request(&request(user_id)).await?;

        assert!(repository.find_request(first.id()).await?.is_none());
        assert!(repository.find_request_for_user(user_id).await?.is_some());
        Ok(())
    }
}
