//! Role-based permission decision.

use crate::RoleWithPermissions;

/// Decides whether the resolved roles grant the required capability.
///
/// Denies by default and allows on the first permission whose value equals
/// `required`. There is no hierarchy, wildcard or scope implication. The roles
/// must be resolved for the current request; a cached view would let revoked
/// assignments keep granting access.
#[must_use]
pub fn check_permission(roles: &[RoleWithPermissions], required: &str) -> bool {
    roles.iter().any(|role| role.grants(required))
}
