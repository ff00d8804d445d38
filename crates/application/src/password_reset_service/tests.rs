use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use warden_core::{AppError, AppResult};
use warden_domain::{ResetRequestId, UserId};

use crate::Clock;
use crate::test_support::{FakePasswordResetRepository, FixedClock};

use super::PasswordResetService;

struct Fixture {
    service: PasswordResetService,
    repository: Arc<FakePasswordResetRepository>,
    clock: Arc<FixedClock>,
}

fn fixture() -> Fixture {
    let repository = Arc::new(FakePasswordResetRepository::default());
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_default(),
    ));
    let service = PasswordResetService::new(repository.clone(), clock.clone(), Duration::hours(1));
    Fixture {
        service,
        repository,
        clock,
    }
}

#[tokio::test]
async fn create_issues_token_and_stores_only_its_hash() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();

    let issued = fixture.service.create(user_id).await?;

    assert_eq!(issued.token.len(), 64);
    assert_ne!(issued.request.token_hash(), issued.token);
    assert_eq!(
        issued.request.expires_at(),
        fixture.clock.now() + Duration::hours(1)
    );
    assert!(fixture.service.valid_for_user(user_id).await?);
    Ok(())
}

#[tokio::test]
async fn create_while_valid_request_exists_is_conflict() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();
    let first = fixture.service.create(user_id).await?;

    let second = fixture.service.create(user_id).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    let still_valid = fixture
        .service
        .get_request_id(first.request.id(), &first.token)
        .await?;
    assert_eq!(still_valid, Some(first.request.id()));
    Ok(())
}

#[tokio::test]
async fn create_after_delete_succeeds() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();
    let first = fixture.service.create(user_id).await?;

    fixture.service.delete(first.request.id()).await?;
    let second = fixture.service.create(user_id).await?;

    assert_ne!(second.request.id(), first.request.id());
    Ok(())
}

#[tokio::test]
async fn expired_request_is_superseded_by_next_create() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();
    let first = fixture.service.create(user_id).await?;

    fixture.clock.advance(Duration::hours(1));
    assert!(!fixture.service.valid_for_user(user_id).await?);
    assert_eq!(fixture.repository.stored_count().await, 1);

    let second = fixture.service.create(user_id).await?;

    assert_eq!(fixture.repository.stored_count().await, 1);
    assert!(
        fixture
            .service
            .get_request_id(first.request.id(), &first.token)
            .await?
            .is_none()
    );
    assert!(fixture.service.valid(second.request.id(), user_id).await?);
    Ok(())
}

#[tokio::test]
async fn request_expires_exactly_at_its_deadline() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();
    let issued = fixture.service.create(user_id).await?;

    fixture
        .clock
        .advance(Duration::hours(1) - Duration::milliseconds(1));
    let before = fixture.service.valid(issued.request.id(), user_id).await?;
    fixture.clock.advance(Duration::milliseconds(1));
    let at_deadline = fixture.service.valid(issued.request.id(), user_id).await?;

    assert!(before);
    assert!(!at_deadline);
    Ok(())
}

#[tokio::test]
async fn wrong_token_does_not_resolve() -> AppResult<()> {
    let fixture = fixture();
    let issued = fixture.service.create(UserId::new()).await?;

    let resolved = fixture
        .service
        .get_request_id(issued.request.id(), "0000")
        .await?;
    let unknown = fixture
        .service
        .get_request_id(ResetRequestId::new(), &issued.token)
        .await?;

    assert!(resolved.is_none());
    assert!(unknown.is_none());
    Ok(())
}

#[tokio::test]
async fn valid_checks_ownership() -> AppResult<()> {
    let fixture = fixture();
    let owner = UserId::new();
    let issued = fixture.service.create(owner).await?;

    assert!(fixture.service.valid(issued.request.id(), owner).await?);
    assert!(
        !fixture
            .service
            .valid(issued.request.id(), UserId::new())
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn get_expires_at_requires_a_valid_request() -> AppResult<()> {
    let fixture = fixture();
    let user_id = UserId::new();

    let missing = fixture.service.get_expires_at(user_id).await;
    let issued = fixture.service.create(user_id).await?;
    let expires_at = fixture.service.get_expires_at(user_id).await?;

    assert!(matches!(missing, Err(AppError::NotFound(_))));
    assert_eq!(expires_at, issued.request.expires_at());
    Ok(())
}

#[tokio::test]
async fn deleting_absent_request_succeeds() -> AppResult<()> {
    let fixture = fixture();

    fixture.service.delete(ResetRequestId::new()).await
}
