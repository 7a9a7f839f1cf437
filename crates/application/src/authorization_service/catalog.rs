use std::collections::BTreeMap;

use tenantdesk_domain::Permission;

use super::*;

/// Active permissions sharing one module prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionModuleGroup {
    /// Module bucket.
    pub module: String,
    /// Permissions in the module, sorted by key.
    pub permissions: Vec<Permission>,
}

impl AuthorizationService {
    /// Lists the active permission catalog grouped by module.
    pub async fn list_permission_catalog(&self) -> AppResult<Vec<PermissionModuleGroup>> {
        let permissions = self.repository.list_permissions().await?;

        let mut modules: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in permissions.into_iter().filter(Permission::is_active) {
            modules
                .entry(permission.module().to_owned())
                .or_default()
                .push(permission);
        }

        Ok(modules
            .into_iter()
            .map(|(module, mut permissions)| {
                permissions.sort_by(|left, right| left.key().cmp(right.key()));
                PermissionModuleGroup {
                    module,
                    permissions,
                }
            })
            .collect())
    }
}
