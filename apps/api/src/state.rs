use std::sync::Arc;

use tenantdesk_application::{AuthorizationService, CompanyRepository, MenuService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub menu_service: MenuService,
    pub company_repository: Arc<dyn CompanyRepository>,
    pub frontend_url: String,
    pub bootstrap_token: String,
}

#[cfg(test)]
impl AppState {
    /// State backed by a single in-memory store.
    pub fn in_memory(
        store: Arc<tenantdesk_infrastructure::InMemoryAccessStore>,
        menu: tenantdesk_application::MenuServiceConfig,
    ) -> Self {
        let authorization_service = AuthorizationService::new(store.clone());
        let menu_service = MenuService::new(store.clone(), authorization_service.clone(), menu);

        Self {
            authorization_service,
            menu_service,
            company_repository: store,
            frontend_url: "http://localhost:3000".to_owned(),
            bootstrap_token: "bootstrap-token".to_owned(),
        }
    }
}

/// Company 2 with an administrator (user 1) holding both security
/// permissions directly and a viewer (user 5) whose manager role grants
/// inventory view and delete, with delete denied directly. Company 3 exists
/// without members.
#[cfg(test)]
pub async fn seeded_access_store() -> Arc<tenantdesk_infrastructure::InMemoryAccessStore> {
    use tenantdesk_core::{CompanyId, UserId};
    use tenantdesk_domain::{
        Company, Permission, PermissionId, Role, RoleId, RolePermission, UserCompanyPermission,
        UserCompanyRole,
    };

    let store = Arc::new(tenantdesk_infrastructure::InMemoryAccessStore::new());
    let company_id = CompanyId::new(2);

    for (id, name) in [(2, "Acme"), (3, "Globex")] {
        let company = Company::new(CompanyId::new(id), name).unwrap_or_else(|_| unreachable!());
        store.save_company(company).await;
    }
    for user_id in [1, 5] {
        assert!(
            store
                .add_membership(UserId::new(user_id), company_id)
                .await
                .is_ok()
        );
    }

    let permissions = [
        (1, "security.authorization.read"),
        (2, "security.permission.read"),
        (10, "inventory.view"),
        (11, "inventory.delete"),
    ];
    for (id, key) in permissions {
        let permission =
            Permission::new(PermissionId::new(id), key, key, true).unwrap_or_else(|_| unreachable!());
        assert!(store.save_permission(permission).await.is_ok());
    }

    let manager = Role::new(RoleId::new(1), "Manager", true).unwrap_or_else(|_| unreachable!());
    store.save_role(manager).await;
    for permission_id in [10, 11] {
        store
            .save_role_permission(RolePermission {
                role_id: RoleId::new(1),
                permission_id: PermissionId::new(permission_id),
                is_allowed: true,
            })
            .await;
    }
    assert!(
        store
            .assign_role(UserCompanyRole {
                user_id: UserId::new(5),
                company_id,
                role_id: RoleId::new(1),
                is_active: true,
            })
            .await
            .is_ok()
    );

    let direct_rows = [(1, 1, true), (1, 2, true), (5, 11, false)];
    for (user_id, permission_id, is_allowed) in direct_rows {
        assert!(
            store
                .set_direct_permission(UserCompanyPermission {
                    user_id: UserId::new(user_id),
                    company_id,
                    permission_id: PermissionId::new(permission_id),
                    is_allowed,
                })
                .await
                .is_ok()
        );
    }

    store
}
