use std::sync::Arc;

use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, PermissionScope, RoleId};

use crate::test_support::FakeAccessControlStore;
use crate::{AccessControlLimits, CreateRoleInput, PermissionInput, RoleService};

use super::PermissionService;

fn input(value: &str) -> PermissionInput {
    PermissionInput {
        value: value.to_owned(),
        scope: PermissionScope::Admin,
        description: format!("grants {value}"),
    }
}

fn build_service() -> (PermissionService, Arc<FakeAccessControlStore>) {
    let store = Arc::new(FakeAccessControlStore::default());
    (PermissionService::new(store.clone(), store.clone()), store)
}

#[tokio::test]
async fn create_permission_trims_value_and_is_readable() -> AppResult<()> {
    let (service, _) = build_service();

    let created = service.create_permission(input("  admin.roles.create ")).await?;
    let fetched = service.get_permission(created.id()).await?;

    assert_eq!(created.value(), "admin.roles.create");
    assert_eq!(fetched, Some(created));
    Ok(())
}

#[tokio::test]
async fn create_permission_rejects_blank_value() {
    let (service, store) = build_service();

    let result = service.create_permission(input("   ")).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(matches!(store_permissions(&store).await, Ok(count) if count == 0));
}

#[tokio::test]
async fn get_permission_returns_none_for_unknown_id() -> AppResult<()> {
    let (service, _) = build_service();

    assert!(service.get_permission(PermissionId::new()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_permission_replaces_fields() -> AppResult<()> {
    let (service, _) = build_service();
    let created = service.create_permission(input("user.profile.read")).await?;

    let updated = service
        .update_permission(
            created.id(),
            PermissionInput {
                value: "user.profile.view".to_owned(),
                scope: PermissionScope::User,
                description: "view own profile".to_owned(),
            },
        )
        .await?;

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.value(), "user.profile.view");
    assert_eq!(updated.scope(), PermissionScope::User);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_unknown_permission_are_not_found() {
    let (service, _) = build_service();

    let updated = service
        .update_permission(PermissionId::new(), input("admin.x"))
        .await;
    let deleted = service.delete_permission(PermissionId::new()).await;

    assert!(matches!(updated, Err(AppError::NotFound(_))));
    assert!(matches!(deleted, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn list_permissions_for_role_skips_deleted_permissions() -> AppResult<()> {
    let (service, store) = build_service();
    let roles = RoleService::new(store.clone(), store.clone(), AccessControlLimits::default());
    let kept = service.create_permission(input("admin.roles.read")).await?;
    let dropped = service.create_permission(input("admin.roles.write")).await?;
    let role = roles
        .create_role(CreateRoleInput {
            name: "auditor".to_owned(),
            permission_ids: vec![kept.id(), dropped.id()],
        })
        .await?;

    service.delete_permission(dropped.id()).await?;
    let permissions = service.list_permissions_for_role(role.role().id()).await?;

    assert_eq!(permissions, vec![kept]);
    Ok(())
}

#[tokio::test]
async fn list_permissions_for_unknown_role_is_not_found() {
    let (service, _) = build_service();

    let result = service.list_permissions_for_role(RoleId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

async fn store_permissions(store: &FakeAccessControlStore) -> AppResult<usize> {
    use crate::PermissionRepository;

    Ok(store.list_permissions().await?.len())
}
