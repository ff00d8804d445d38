use std::collections::HashMap;

use tracing::warn;

use warden_core::AppResult;
use warden_domain::{PermissionId, RoleWithPermissions, dedupe_preserving_order};

use crate::RoleRecord;

use super::RoleService;

impl RoleService {
    /// Joins stored roles with the permission catalog.
    ///
    /// Runs a single catalog lookup for all referenced ids. References to
    /// permissions that no longer exist are skipped, not treated as errors.
    pub(crate) async fn resolve_roles(
        &self,
        records: Vec<RoleRecord>,
    ) -> AppResult<Vec<RoleWithPermissions>> {
        let referenced: Vec<PermissionId> = records
            .iter()
            .flat_map(|record| record.permission_ids.iter().copied())
            .collect();
        let referenced = dedupe_preserving_order(&referenced);

        let catalog: HashMap<PermissionId, _> = if referenced.is_empty() {
            HashMap::new()
        } else {
            self.permission_repository
                .list_permissions_by_ids(&referenced)
                .await?
                .into_iter()
                .map(|permission| (permission.id(), permission))
                .collect()
        };

        Ok(records
            .into_iter()
            .map(|record| {
                let permissions = record
                    .permission_ids
                    .iter()
                    .filter_map(|permission_id| {
                        let permission = catalog.get(permission_id).cloned();
                        if permission.is_none() {
                            warn!(
                                role_id = %record.role.id(),
                                permission_id = %permission_id,
                                "skipping unresolvable permission reference"
                            );
                        }
                        permission
                    })
                    .collect();

                RoleWithPermissions::new(record.role, permissions)
            })
            .collect())
    }
}
