use warden_domain::DEFAULT_MAX_PERMISSIONS_PER_ROLE;

/// Request-size bounds for role and assignment mutations.
///
/// Set once at startup and shared read-only by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessControlLimits {
    /// Maximum number of permissions attached to one role.
    pub max_permissions_per_role: usize,
    /// Maximum number of user ids in one add/remove batch.
    pub max_users_per_batch: usize,
    /// Maximum number of roles set on one user.
    pub max_roles_per_user: usize,
}

impl Default for AccessControlLimits {
    fn default() -> Self {
        Self {
            max_permissions_per_role: DEFAULT_MAX_PERMISSIONS_PER_ROLE,
            max_users_per_batch: 500,
            max_roles_per_user: 500,
        }
    }
}
