use std::sync::Arc;

use warden_core::{AppError, AppResult};
use warden_domain::{RoleId, UserId};

use crate::test_support::FakeAccessControlStore;
use crate::{AccessControlLimits, CreateRoleInput, RoleService};

use super::UserRoleService;

struct Fixture {
    service: UserRoleService,
    roles: RoleService,
    store: Arc<FakeAccessControlStore>,
}

fn fixture(limits: AccessControlLimits) -> Fixture {
    let store = Arc::new(FakeAccessControlStore::default());
    let roles = RoleService::new(store.clone(), store.clone(), limits);
    let service = UserRoleService::new(store.clone(), store.clone(), roles.clone(), limits);
    Fixture {
        service,
        roles,
        store,
    }
}

async fn create_role(roles: &RoleService, name: &str) -> AppResult<RoleId> {
    let role = roles
        .create_role(CreateRoleInput {
            name: name.to_owned(),
            permission_ids: Vec::new(),
        })
        .await?;
    Ok(role.role().id())
}

#[tokio::test]
async fn add_users_is_idempotent() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits::default());
    let role_id = create_role(&fixture.roles, "support").await?;
    let alice = UserId::new();
    let bob = UserId::new();

    let first = fixture
        .service
        .add_users_to_role(role_id, &[alice, bob, alice])
        .await?;
    fixture.service.add_users_to_role(role_id, &[alice]).await?;

    assert_eq!(first, vec![alice, bob]);
    assert_eq!(fixture.store.assignment_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn removing_absent_users_succeeds() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits::default());
    let role_id = create_role(&fixture.roles, "support").await?;
    let alice = UserId::new();
    fixture.service.add_users_to_role(role_id, &[alice]).await?;

    let removed = fixture
        .service
        .remove_users_from_role(role_id, &[alice, UserId::new()])
        .await?;

    assert_eq!(removed.len(), 2);
    assert!(fixture.service.list_users_for_role(role_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_user_batch_is_rejected() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits::default());
    let role_id = create_role(&fixture.roles, "support").await?;

    let added = fixture.service.add_users_to_role(role_id, &[]).await;
    let removed = fixture.service.remove_users_from_role(role_id, &[]).await;

    assert!(matches!(added, Err(AppError::Validation(_))));
    assert!(matches!(removed, Err(AppError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn oversized_user_batch_is_rejected_without_mutation() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits {
        max_users_per_batch: 2,
        ..AccessControlLimits::default()
    });
    let role_id = create_role(&fixture.roles, "support").await?;

    let result = fixture
        .service
        .add_users_to_role(role_id, &[UserId::new(), UserId::new(), UserId::new()])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(fixture.store.assignment_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn unknown_role_is_not_found() {
    let fixture = fixture(AccessControlLimits::default());

    let added = fixture
        .service
        .add_users_to_role(RoleId::new(), &[UserId::new()])
        .await;
    let set = fixture
        .service
        .set_roles_for_user(UserId::new(), &[RoleId::new()])
        .await;

    assert!(matches!(added, Err(AppError::NotFound(_))));
    assert!(matches!(set, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn set_roles_replaces_and_empty_list_clears() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits::default());
    let support = create_role(&fixture.roles, "support").await?;
    let billing = create_role(&fixture.roles, "billing").await?;
    let user_id = UserId::new();

    fixture
        .service
        .set_roles_for_user(user_id, &[support, billing])
        .await?;
    fixture.service.set_roles_for_user(user_id, &[billing]).await?;
    let after_replace = fixture
        .service
        .list_roles_with_permissions_for_user(user_id)
        .await?;

    fixture.service.set_roles_for_user(user_id, &[]).await?;
    let after_clear = fixture
        .service
        .list_roles_with_permissions_for_user(user_id)
        .await?;

    let names: Vec<&str> = after_replace.iter().map(|role| role.role().name()).collect();
    assert_eq!(names, vec!["billing"]);
    assert!(after_clear.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_a_role_drops_its_assignments() -> AppResult<()> {
    let fixture = fixture(AccessControlLimits::default());
    let role_id = create_role(&fixture.roles, "support").await?;
    let user_id = UserId::new();
    fixture.service.add_users_to_role(role_id, &[user_id]).await?;

    fixture.roles.delete_role(role_id).await?;

    assert!(
        fixture
            .service
            .list_roles_with_permissions_for_user(user_id)
            .await?
            .is_empty()
    );
    Ok(())
}
