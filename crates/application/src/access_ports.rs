use async_trait::async_trait;

use tenantdesk_core::{AppResult, CompanyId, UserId};
use tenantdesk_domain::{
    Company, MenuNode, Permission, Role, RoleId, RolePermission, UserCompanyPermission,
    UserCompanyRole,
};

/// Read-only port over the role and permission relations.
///
/// Implementations return raw rows; filtering by activity and precedence is
/// applied by [`crate::AuthorizationService`].
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Lists every role, active or not.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Lists the permission catalog, active or not.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists role assignments held by a user in a company.
    async fn list_user_company_roles(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyRole>>;

    /// Lists permission rows attached to the given roles.
    async fn list_role_permissions(&self, role_ids: &[RoleId]) -> AppResult<Vec<RolePermission>>;

    /// Lists direct grants and denials for a user in a company.
    async fn list_user_company_permissions(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyPermission>>;
}

/// Read-only port over navigation menu rows.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Lists every active menu node.
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>>;
}

/// Port for company membership lookups.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Returns whether the user holds a membership record in the company.
    async fn is_member(&self, user_id: UserId, company_id: CompanyId) -> AppResult<bool>;

    /// Lists companies the user belongs to, ordered by name.
    async fn list_companies_for_user(&self, user_id: UserId) -> AppResult<Vec<Company>>;
}
