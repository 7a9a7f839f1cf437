use std::collections::{BTreeMap, HashSet};

use tenantdesk_domain::{Permission, Provenance, RoleId};
use tracing::debug;

use super::*;

/// Caller-selected extras for an authorization summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Also return directly denied permissions for audit display.
    pub include_denied: bool,
}

/// Active role with its assignment state for the summarized user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentStatus {
    /// Role identifier.
    pub role_id: RoleId,
    /// Role display name.
    pub name: String,
    /// Whether the user holds the role in the company.
    pub assigned: bool,
}

/// Permission entry annotated with why it is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionProvenanceEntry {
    /// Permission key.
    pub key: String,
    /// Permission display name.
    pub name: String,
    /// Module bucket derived from the key.
    pub module: String,
    /// Winning source for the key.
    pub provenance: Provenance,
    /// Resolved outcome.
    pub allowed: bool,
}

/// Administrative view of roles and permissions for one (user, company).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationSummary {
    /// Summarized user.
    pub user_id: UserId,
    /// Company scope.
    pub company_id: CompanyId,
    /// Every active role, sorted by name.
    pub roles: Vec<RoleAssignmentStatus>,
    /// Effective permissions, sorted by module then key.
    pub permissions: Vec<PermissionProvenanceEntry>,
    /// Directly denied permissions; empty unless requested.
    pub denied: Vec<PermissionProvenanceEntry>,
}

impl AuthorizationService {
    /// Builds the role and provenance report for a user in a company.
    ///
    /// Membership is not checked here; callers reject unknown pairs first.
    pub async fn build_authorization_summary(
        &self,
        user_id: UserId,
        company_id: CompanyId,
        options: SummaryOptions,
    ) -> AppResult<AuthorizationSummary> {
        let snapshot = self.load_snapshot(user_id, company_id).await?;
        let (permissions, denied) = summarize_permissions(&snapshot);

        debug!(
            %user_id,
            %company_id,
            effective_permissions = permissions.len(),
            denied_permissions = denied.len(),
            "built authorization summary"
        );

        Ok(AuthorizationSummary {
            user_id,
            company_id,
            roles: summarize_roles(&snapshot),
            permissions,
            denied: if options.include_denied {
                denied
            } else {
                Vec::new()
            },
        })
    }
}

fn summarize_roles(snapshot: &AccessSnapshot) -> Vec<RoleAssignmentStatus> {
    let assigned: HashSet<RoleId> = snapshot.active_assigned_role_ids().into_iter().collect();

    snapshot
        .active_roles()
        .into_iter()
        .map(|role| RoleAssignmentStatus {
            role_id: role.id(),
            name: role.name().to_owned(),
            assigned: assigned.contains(&role.id()),
        })
        .collect()
}

/// Returns (effective entries, denied entries), both sorted by module then key.
fn summarize_permissions(
    snapshot: &AccessSnapshot,
) -> (Vec<PermissionProvenanceEntry>, Vec<PermissionProvenanceEntry>) {
    let sources = snapshot.sources();
    let by_key: BTreeMap<&str, &Permission> = snapshot
        .active_permissions()
        .into_iter()
        .map(|permission| (permission.key().as_str(), permission))
        .collect();

    // Later layers replace earlier ones, so denials land last.
    let mut provenance: BTreeMap<&str, Provenance> = BTreeMap::new();
    for key in &sources.role_derived {
        provenance.insert(key.as_str(), Provenance::Role);
    }
    for key in &sources.direct_allow {
        provenance.insert(key.as_str(), Provenance::DirectGrant);
    }
    for key in &sources.direct_deny {
        provenance.insert(key.as_str(), Provenance::DirectDeny);
    }

    let mut allowed = Vec::new();
    let mut denied = Vec::new();
    for (key, provenance) in provenance {
        let Some(permission) = by_key.get(key) else {
            continue;
        };

        let entry = PermissionProvenanceEntry {
            key: key.to_owned(),
            name: permission.name().to_owned(),
            module: permission.module().to_owned(),
            provenance,
            allowed: provenance.is_allowed(),
        };

        if entry.allowed {
            allowed.push(entry);
        } else {
            denied.push(entry);
        }
    }

    sort_by_module_then_key(&mut allowed);
    sort_by_module_then_key(&mut denied);

    (allowed, denied)
}

fn sort_by_module_then_key(entries: &mut [PermissionProvenanceEntry]) {
    entries.sort_by(|left, right| {
        left.module
            .cmp(&right.module)
            .then_with(|| left.key.cmp(&right.key))
    });
}
