use warden_application::{
    AuthorizationService, BrokerLinkService, PasswordRecoveryService, PermissionService,
    RoleService, UserRoleService,
};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub permission_service: PermissionService,
    pub role_service: RoleService,
    pub user_role_service: UserRoleService,
    pub authorization_service: AuthorizationService,
    pub password_recovery_service: PasswordRecoveryService,
    pub broker_link_service: BrokerLinkService,
}
