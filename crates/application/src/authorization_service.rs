use std::collections::HashSet;
use std::sync::Arc;

use tenantdesk_core::{AppError, AppResult, CompanyId, UserId, UserIdentity};
use tenantdesk_domain::SystemPermission;
use tracing::debug;

use crate::AccessRepository;

mod catalog;
mod resolution;
mod summary;


pub use catalog::PermissionModuleGroup;
pub use resolution::{AccessSnapshot, PermissionSources, merge_effective_permissions};
pub use summary::{
    AuthorizationSummary, PermissionProvenanceEntry, RoleAssignmentStatus, SummaryOptions,
};

/// Application service resolving what a user may do inside a company.
///
/// Holds no state besides the repository handle; every call reads fresh rows.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AccessRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Returns the effective permission keys of a user in a company.
    ///
    /// Effective = (role-derived ∪ direct grants) − direct denials. A pair
    /// without any rows yields an empty set. The set is unordered.
    pub async fn resolve_effective_permissions(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<HashSet<String>> {
        let snapshot = self.load_snapshot(user_id, company_id).await?;
        let effective = snapshot.sources().effective();

        debug!(
            %user_id,
            %company_id,
            effective_permissions = effective.len(),
            "resolved effective permissions"
        );

        Ok(effective)
    }

    /// Returns whether the user may exercise the permission key in the company.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        company_id: CompanyId,
        permission_key: &str,
    ) -> AppResult<bool> {
        let effective = self
            .resolve_effective_permissions(user_id, company_id)
            .await?;

        Ok(effective.contains(permission_key.trim()))
    }

    /// Ensures the identity holds a system permission in its current company.
    pub async fn require_permission(
        &self,
        identity: &UserIdentity,
        permission: SystemPermission,
    ) -> AppResult<()> {
        let granted = self
            .has_permission(
                identity.user_id(),
                identity.company_id(),
                permission.as_str(),
            )
            .await?;

        if granted {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing permission '{}' in company '{}'",
            identity.user_id(),
            permission.as_str(),
            identity.company_id()
        )))
    }

    /// Fetches every row resolution needs for one (user, company) pair.
    ///
    /// Any failed fetch aborts the whole call.
    async fn load_snapshot(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<AccessSnapshot> {
        let roles = self.repository.list_roles().await?;
        let permissions = self.repository.list_permissions().await?;
        let member_roles = self
            .repository
            .list_user_company_roles(user_id, company_id)
            .await?;

        let mut snapshot = AccessSnapshot::new(roles, permissions, member_roles);

        let role_ids = snapshot.active_assigned_role_ids();
        if !role_ids.is_empty() {
            let role_grants = self.repository.list_role_permissions(&role_ids).await?;
            snapshot = snapshot.with_role_grants(role_grants);
        }

        let direct_rows = self
            .repository
            .list_user_company_permissions(user_id, company_id)
            .await?;

        Ok(snapshot.with_direct_rows(direct_rows))
    }
}
