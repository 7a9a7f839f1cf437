use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tenantdesk_application::{AccessRepository, CompanyRepository, MenuRepository};
use tenantdesk_core::{AppError, AppResult, CompanyId, UserId};
use tenantdesk_domain::{
    Company, MenuId, MenuNode, Permission, PermissionId, Role, RoleId, RolePermission,
    UserCompanyPermission, UserCompanyRole,
};
use tokio::sync::RwLock;


/// In-memory store implementing every access-control port.
///
/// Rows live in id-keyed arenas; uniqueness of permission keys and of the
/// (user, company, role) and (user, company, permission) triples is enforced
/// on insert.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    companies: RwLock<BTreeMap<CompanyId, Company>>,
    memberships: RwLock<BTreeSet<(UserId, CompanyId)>>,
    roles: RwLock<BTreeMap<RoleId, Role>>,
    permissions: RwLock<BTreeMap<PermissionId, Permission>>,
    role_permissions: RwLock<HashMap<(RoleId, PermissionId), RolePermission>>,
    user_company_roles: RwLock<BTreeMap<(UserId, CompanyId, RoleId), UserCompanyRole>>,
    user_company_permissions:
        RwLock<BTreeMap<(UserId, CompanyId, PermissionId), UserCompanyPermission>>,
    menus: RwLock<BTreeMap<MenuId, MenuNode>>,
}

impl InMemoryAccessStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a company, replacing any record with the same id.
    pub async fn save_company(&self, company: Company) {
        self.companies.write().await.insert(company.id(), company);
    }

    /// Records that the user belongs to the company.
    pub async fn add_membership(&self, user_id: UserId, company_id: CompanyId) -> AppResult<()> {
        if !self.companies.read().await.contains_key(&company_id) {
            return Err(AppError::NotFound(format!(
                "company '{company_id}' does not exist"
            )));
        }

        self.memberships.write().await.insert((user_id, company_id));
        Ok(())
    }

    /// Saves a role, replacing any record with the same id.
    pub async fn save_role(&self, role: Role) {
        self.roles.write().await.insert(role.id(), role);
    }

    /// Saves a permission catalog entry.
    pub async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;

        let duplicate_key = permissions.values().any(|stored| {
            stored.id() != permission.id() && stored.key() == permission.key()
        });
        if duplicate_key {
            return Err(AppError::Conflict(format!(
                "permission key '{}' already exists",
                permission.key()
            )));
        }

        permissions.insert(permission.id(), permission);
        Ok(())
    }

    /// Attaches a permission row to a role, replacing an earlier row.
    pub async fn save_role_permission(&self, row: RolePermission) {
        self.role_permissions
            .write()
            .await
            .insert((row.role_id, row.permission_id), row);
    }

    /// Assigns a role to a user within a company.
    pub async fn assign_role(&self, row: UserCompanyRole) -> AppResult<()> {
        let key = (row.user_id, row.company_id, row.role_id);
        let mut assignments = self.user_company_roles.write().await;

        if assignments.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "role '{}' is already assigned to user '{}' in company '{}'",
                row.role_id, row.user_id, row.company_id
            )));
        }

        assignments.insert(key, row);
        Ok(())
    }

    /// Stores a direct grant or denial for a user within a company.
    pub async fn set_direct_permission(&self, row: UserCompanyPermission) -> AppResult<()> {
        let key = (row.user_id, row.company_id, row.permission_id);
        let mut direct_rows = self.user_company_permissions.write().await;

        if direct_rows.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already has a direct row for user '{}' in company '{}'",
                row.permission_id, row.user_id, row.company_id
            )));
        }

        direct_rows.insert(key, row);
        Ok(())
    }

    /// Saves a menu node, replacing any node with the same id.
    pub async fn save_menu_node(&self, node: MenuNode) {
        self.menus.write().await.insert(node.id, node);
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.read().await.values().cloned().collect())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.read().await.values().cloned().collect())
    }

    async fn list_user_company_roles(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyRole>> {
        Ok(self
            .user_company_roles
            .read()
            .await
            .values()
            .filter(|row| row.user_id == user_id && row.company_id == company_id)
            .copied()
            .collect())
    }

    async fn list_role_permissions(&self, role_ids: &[RoleId]) -> AppResult<Vec<RolePermission>> {
        let mut rows: Vec<RolePermission> = self
            .role_permissions
            .read()
            .await
            .values()
            .filter(|row| role_ids.contains(&row.role_id))
            .copied()
            .collect();
        rows.sort_by_key(|row| (row.role_id, row.permission_id));

        Ok(rows)
    }

    async fn list_user_company_permissions(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyPermission>> {
        Ok(self
            .user_company_permissions
            .read()
            .await
            .values()
            .filter(|row| row.user_id == user_id && row.company_id == company_id)
            .copied()
            .collect())
    }
}

#[async_trait]
impl MenuRepository for InMemoryAccessStore {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        Ok(self
            .menus
            .read()
            .await
            .values()
            .filter(|node| node.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CompanyRepository for InMemoryAccessStore {
    async fn is_member(&self, user_id: UserId, company_id: CompanyId) -> AppResult<bool> {
        Ok(self
            .memberships
            .read()
            .await
            .contains(&(user_id, company_id)))
    }

    async fn list_companies_for_user(&self, user_id: UserId) -> AppResult<Vec<Company>> {
        let memberships = self.memberships.read().await;
        let companies = self.companies.read().await;

        let mut listed: Vec<Company> = memberships
            .iter()
            .filter(|(member, _)| *member == user_id)
            .filter_map(|(_, company_id)| companies.get(company_id).cloned())
            .collect();
        listed.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(listed)
    }
}
