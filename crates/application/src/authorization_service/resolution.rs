use std::collections::{BTreeSet, HashMap, HashSet};

use tenantdesk_domain::{
    Permission, PermissionId, Role, RoleId, RolePermission, UserCompanyPermission, UserCompanyRole,
};

/// Combines permission sources: `(role_derived ∪ direct_allow) − direct_deny`.
///
/// A key present in `direct_deny` is never effective, whatever else grants it.
#[must_use]
pub fn merge_effective_permissions(
    role_derived: &HashSet<String>,
    direct_allow: &HashSet<String>,
    direct_deny: &HashSet<String>,
) -> HashSet<String> {
    role_derived
        .iter()
        .chain(direct_allow.iter())
        .filter(|key| !direct_deny.contains(*key))
        .cloned()
        .collect()
}

/// Permission keys split by where they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSources {
    /// Keys reachable through active role assignments.
    pub role_derived: HashSet<String>,
    /// Keys granted directly in the company.
    pub direct_allow: HashSet<String>,
    /// Keys denied directly in the company.
    pub direct_deny: HashSet<String>,
}

impl PermissionSources {
    /// Returns the deny-resolved effective set.
    #[must_use]
    pub fn effective(&self) -> HashSet<String> {
        merge_effective_permissions(&self.role_derived, &self.direct_allow, &self.direct_deny)
    }
}

/// Raw rows read for one (user, company) pair plus id-keyed indexes over them.
#[derive(Debug, Clone, Default)]
pub struct AccessSnapshot {
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
    member_roles: Vec<UserCompanyRole>,
    role_grants: Vec<RolePermission>,
    direct_rows: Vec<UserCompanyPermission>,
}

impl AccessSnapshot {
    /// Indexes the role and permission catalogs and keeps the member rows.
    #[must_use]
    pub fn new(
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        member_roles: Vec<UserCompanyRole>,
    ) -> Self {
        Self {
            roles: roles.into_iter().map(|role| (role.id(), role)).collect(),
            permissions: permissions
                .into_iter()
                .map(|permission| (permission.id(), permission))
                .collect(),
            member_roles,
            role_grants: Vec::new(),
            direct_rows: Vec::new(),
        }
    }

    /// Attaches role to permission rows.
    #[must_use]
    pub fn with_role_grants(mut self, role_grants: Vec<RolePermission>) -> Self {
        self.role_grants = role_grants;
        self
    }

    /// Attaches direct user-company permission rows.
    #[must_use]
    pub fn with_direct_rows(mut self, direct_rows: Vec<UserCompanyPermission>) -> Self {
        self.direct_rows = direct_rows;
        self
    }

    /// Role ids held through an active assignment of an active role, ascending.
    #[must_use]
    pub fn active_assigned_role_ids(&self) -> Vec<RoleId> {
        self.member_roles
            .iter()
            .filter(|row| row.is_active)
            .map(|row| row.role_id)
            .filter(|role_id| self.roles.get(role_id).is_some_and(Role::is_active))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns every active role, sorted by name then id.
    #[must_use]
    pub fn active_roles(&self) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self.roles.values().filter(|role| role.is_active()).collect();
        roles.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(&right.id()))
        });
        roles
    }

    /// Looks up an active catalog entry; unknown or inactive ids yield `None`.
    #[must_use]
    pub fn active_permission(&self, permission_id: PermissionId) -> Option<&Permission> {
        self.permissions
            .get(&permission_id)
            .filter(|permission| permission.is_active())
    }

    /// Returns the active permission catalog.
    #[must_use]
    pub fn active_permissions(&self) -> Vec<&Permission> {
        self.permissions
            .values()
            .filter(|permission| permission.is_active())
            .collect()
    }

    /// Splits the snapshot into role-derived, direct-allow and direct-deny keys.
    #[must_use]
    pub fn sources(&self) -> PermissionSources {
        let mut sources = PermissionSources::default();

        let role_ids: HashSet<RoleId> = self.active_assigned_role_ids().into_iter().collect();
        for grant in &self.role_grants {
            if !grant.is_allowed || !role_ids.contains(&grant.role_id) {
                continue;
            }
            if let Some(permission) = self.active_permission(grant.permission_id) {
                sources
                    .role_derived
                    .insert(permission.key().as_str().to_owned());
            }
        }

        for row in &self.direct_rows {
            let Some(permission) = self.active_permission(row.permission_id) else {
                continue;
            };
            let key = permission.key().as_str().to_owned();
            if row.is_allowed {
                sources.direct_allow.insert(key);
            } else {
                sources.direct_deny.insert(key);
            }
        }

        sources
    }
}
