use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tenantdesk_core::{AppError, AppResult, CompanyId, UserId, UserIdentity};
use tenantdesk_domain::{
    MenuId, MenuNode, OrphanPolicy, Permission, PermissionId, Role, RoleId, RolePermission,
    UserCompanyPermission, UserCompanyRole,
};

use crate::{AccessRepository, AuthorizationService, MenuRepository};

use super::{MenuService, MenuServiceConfig, MenuVisibility, build_menu_tree, filter_menu};

struct FakeMenuRepository {
    nodes: Vec<MenuNode>,
    fetches: AtomicUsize,
}

impl FakeMenuRepository {
    fn new(nodes: Vec<MenuNode>) -> Self {
        Self {
            nodes,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MenuRepository for FakeMenuRepository {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.nodes.clone())
    }
}

/// Grants `inventory.view` to user 5 in company 2 through a direct row.
struct ViewerAccessRepository;

#[async_trait]
impl AccessRepository for ViewerAccessRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(Vec::new())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Permission::new(PermissionId::new(10), "inventory.view", "View inventory", true)
            .map(|permission| vec![permission])
    }

    async fn list_user_company_roles(
        &self,
        _user_id: UserId,
        _company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyRole>> {
        Ok(Vec::new())
    }

    async fn list_role_permissions(&self, _role_ids: &[RoleId]) -> AppResult<Vec<RolePermission>> {
        Ok(Vec::new())
    }

    async fn list_user_company_permissions(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyPermission>> {
        if user_id != UserId::new(5) || company_id != CompanyId::new(2) {
            return Ok(Vec::new());
        }

        Ok(vec![UserCompanyPermission {
            user_id,
            company_id,
            permission_id: PermissionId::new(10),
            is_allowed: true,
        }])
    }
}

fn node(id: i64, parent_id: i64, order: i32, permission_key: Option<&str>) -> MenuNode {
    MenuNode {
        id: MenuId::new(id),
        parent_id: MenuId::new(parent_id),
        name: format!("Menu {id}"),
        url: format!("/menu/{id}"),
        icon: None,
        order,
        permission_key: permission_key.map(ToOwned::to_owned),
        is_active: true,
    }
}

fn ids(nodes: &[MenuNode]) -> Vec<i64> {
    nodes.iter().map(|node| node.id.as_i64()).collect()
}

fn keys(values: &[&str]) -> HashSet<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn menu_service(nodes: Vec<MenuNode>, config: MenuServiceConfig) -> MenuService {
    MenuService::new(
        Arc::new(FakeMenuRepository::new(nodes)),
        AuthorizationService::new(Arc::new(ViewerAccessRepository)),
        config,
    )
}

fn viewer() -> UserIdentity {
    UserIdentity::new(UserId::new(5), "Viewer", None, CompanyId::new(2))
}

#[test]
fn gated_node_is_hidden_without_its_permission() {
    let nodes = vec![
        node(1, 0, 1, None),
        node(2, 0, 2, Some("admin.settings")),
    ];
    let permissions = HashSet::new();

    let visible = filter_menu(nodes, MenuVisibility::Restricted(&permissions));

    assert_eq!(ids(&visible), vec![1]);
}

#[test]
fn blank_permission_key_is_ungated() {
    let nodes = vec![node(1, 0, 1, Some("  "))];
    let permissions = HashSet::new();

    let visible = filter_menu(nodes, MenuVisibility::Restricted(&permissions));

    assert_eq!(ids(&visible), vec![1]);
}

#[test]
fn unrestricted_visibility_returns_every_active_node() {
    let mut inactive = node(3, 0, 3, None);
    inactive.is_active = false;
    let nodes = vec![
        node(2, 0, 2, Some("admin.settings")),
        node(1, 0, 1, Some("inventory.view")),
        inactive,
    ];

    let visible = filter_menu(nodes, MenuVisibility::Unrestricted);

    assert_eq!(ids(&visible), vec![1, 2]);
}

#[test]
fn output_is_ordered_by_parent_then_order_then_id() {
    let nodes = vec![
        node(7, 1, 1, None),
        node(4, 0, 2, None),
        node(6, 1, 1, None),
        node(1, 0, 1, None),
        node(5, 1, 0, None),
        node(3, 0, 2, None),
    ];

    let visible = filter_menu(nodes, MenuVisibility::Unrestricted);

    assert_eq!(ids(&visible), vec![1, 3, 4, 5, 6, 7]);
    for pair in visible.windows(2) {
        let left = (pair[0].parent_id, pair[0].order, pair[0].id);
        let right = (pair[1].parent_id, pair[1].order, pair[1].id);
        assert!(left <= right);
    }
}

#[test]
fn hidden_parent_does_not_hide_visible_child() {
    let nodes = vec![
        node(1, 0, 1, Some("admin.settings")),
        node(2, 1, 1, Some("inventory.view")),
    ];
    let permissions = keys(&["inventory.view"]);

    let visible = filter_menu(nodes, MenuVisibility::Restricted(&permissions));

    assert_eq!(ids(&visible), vec![2]);
}

#[test]
fn tree_nests_children_under_visible_parents() {
    let nodes = vec![
        node(1, 0, 1, None),
        node(2, 1, 2, None),
        node(3, 1, 1, None),
        node(4, 3, 1, None),
        node(5, 0, 0, None),
    ];

    let tree = build_menu_tree(nodes, OrphanPolicy::AttachToRoot);

    let roots: Vec<i64> = tree.iter().map(|entry| entry.node.id.as_i64()).collect();
    assert_eq!(roots, vec![5, 1]);
    let children: Vec<i64> = tree[1]
        .children
        .iter()
        .map(|entry| entry.node.id.as_i64())
        .collect();
    assert_eq!(children, vec![3, 2]);
    assert_eq!(tree[1].children[0].children.len(), 1);
    assert_eq!(tree[1].children[0].children[0].node.id, MenuId::new(4));
}

#[test]
fn orphan_policy_decides_placement_of_hidden_parents_children() {
    let visible = vec![node(1, 0, 1, None), node(2, 9, 1, None), node(3, 2, 1, None)];

    let attached = build_menu_tree(visible.clone(), OrphanPolicy::AttachToRoot);
    let attached_roots: Vec<i64> = attached
        .iter()
        .map(|entry| entry.node.id.as_i64())
        .collect();
    assert_eq!(attached_roots, vec![1, 2]);
    assert_eq!(attached[1].children.len(), 1);

    let dropped = build_menu_tree(visible, OrphanPolicy::Drop);
    let dropped_roots: Vec<i64> = dropped
        .iter()
        .map(|entry| entry.node.id.as_i64())
        .collect();
    assert_eq!(dropped_roots, vec![1]);
    assert!(dropped[0].children.is_empty());
}

#[test]
fn cyclic_parents_never_reach_the_tree() {
    let nodes = vec![node(1, 0, 1, None), node(2, 3, 1, None), node(3, 2, 1, None)];

    let tree = build_menu_tree(nodes, OrphanPolicy::AttachToRoot);

    assert_eq!(tree.len(), 1);
    assert!(tree[0].children.is_empty());
}

#[tokio::test]
async fn identity_filters_menu_by_effective_permissions() {
    let service = menu_service(
        vec![
            node(1, 0, 1, None),
            node(2, 0, 2, Some("admin.settings")),
            node(3, 0, 3, Some("inventory.view")),
        ],
        MenuServiceConfig::default(),
    );
    let identity = viewer();

    let visible = service.visible_menu(Some(&identity)).await;

    assert!(visible.is_ok());
    assert_eq!(ids(&visible.unwrap_or_default()), vec![1, 3]);
}

#[tokio::test]
async fn anonymous_caller_is_rejected_by_default() {
    let service = menu_service(vec![node(1, 0, 1, None)], MenuServiceConfig::default());

    let result = service.visible_menu(None).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn rejected_anonymous_caller_never_loads_the_menu() {
    let repository = Arc::new(FakeMenuRepository::new(vec![node(1, 0, 1, None)]));
    let service = MenuService::new(
        repository.clone(),
        AuthorizationService::new(Arc::new(ViewerAccessRepository)),
        MenuServiceConfig::default(),
    );

    let result = service.visible_menu(None).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn permissive_mode_serves_full_menu_to_anonymous_caller() {
    let service = menu_service(
        vec![node(2, 0, 2, Some("admin.settings")), node(1, 0, 1, None)],
        MenuServiceConfig {
            permissive_if_anonymous: true,
            ..MenuServiceConfig::default()
        },
    );

    let visible = service.visible_menu(None).await;

    assert!(visible.is_ok());
    assert_eq!(ids(&visible.unwrap_or_default()), vec![1, 2]);
}

#[tokio::test]
async fn menu_tree_uses_configured_orphan_policy() {
    let service = menu_service(
        vec![
            node(1, 0, 1, Some("admin.settings")),
            node(2, 1, 1, Some("inventory.view")),
        ],
        MenuServiceConfig {
            permissive_if_anonymous: false,
            orphan_policy: OrphanPolicy::Drop,
        },
    );
    let identity = viewer();

    let tree = service.visible_menu_tree(Some(&identity)).await;

    assert!(tree.is_ok());
    assert!(tree.unwrap_or_default().is_empty());
    assert_eq!(service.orphan_policy(), OrphanPolicy::Drop);
}
