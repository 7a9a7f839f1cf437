use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tenantdesk_core::{AppError, AppResult, UserIdentity};
use tenantdesk_domain::{MenuId, MenuNode, MenuTreeNode, OrphanPolicy};
use tracing::{debug, warn};

use crate::{AuthorizationService, MenuRepository};

#[cfg(test)]
mod tests;

/// What the menu filter may show.
#[derive(Debug, Clone, Copy)]
pub enum MenuVisibility<'a> {
    /// Every active node is visible.
    ///
    /// Tooling escape hatch for anonymous schema discovery, not a security
    /// boundary.
    Unrestricted,
    /// Nodes are visible when ungated or gated by a key in the set.
    Restricted(&'a HashSet<String>),
}

/// Menu behavior switches loaded from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuServiceConfig {
    /// Serve the unfiltered menu to callers without an identity.
    pub permissive_if_anonymous: bool,
    /// Placement of visible nodes whose parent is hidden.
    pub orphan_policy: OrphanPolicy,
}

/// Filters a flat menu and sorts it by (parent id, order, id).
///
/// Visibility is decided per node: a hidden parent does not hide its
/// children.
#[must_use]
pub fn filter_menu(nodes: Vec<MenuNode>, visibility: MenuVisibility<'_>) -> Vec<MenuNode> {
    let mut visible: Vec<MenuNode> = nodes
        .into_iter()
        .filter(|node| node.is_active)
        .filter(|node| match visibility {
            MenuVisibility::Unrestricted => true,
            MenuVisibility::Restricted(permissions) => node
                .gating_key()
                .is_none_or(|key| permissions.contains(key)),
        })
        .collect();

    visible.sort_by(|left, right| {
        left.parent_id
            .cmp(&right.parent_id)
            .then_with(|| left.order.cmp(&right.order))
            .then_with(|| left.id.cmp(&right.id))
    });

    visible
}

/// Materializes a filtered menu into a tree.
///
/// Siblings keep (order, id) ordering. A node whose parent is absent from
/// `nodes` is placed according to `orphan_policy`; nodes caught in a parent
/// cycle never reach a root and are left out.
#[must_use]
pub fn build_menu_tree(nodes: Vec<MenuNode>, orphan_policy: OrphanPolicy) -> Vec<MenuTreeNode> {
    let present: HashSet<MenuId> = nodes.iter().map(|node| node.id).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<MenuId, Vec<MenuNode>> = HashMap::new();
    for node in nodes {
        let parent_present = !node.parent_id.is_root() && present.contains(&node.parent_id);
        if parent_present {
            children.entry(node.parent_id).or_default().push(node);
        } else if node.parent_id.is_root() || orphan_policy == OrphanPolicy::AttachToRoot {
            roots.push(node);
        }
    }

    sort_siblings(&mut roots);
    for siblings in children.values_mut() {
        sort_siblings(siblings);
    }

    roots
        .into_iter()
        .map(|node| attach_children(node, &mut children))
        .collect()
}

fn attach_children(node: MenuNode, children: &mut HashMap<MenuId, Vec<MenuNode>>) -> MenuTreeNode {
    let direct_children = children.remove(&node.id).unwrap_or_default();

    MenuTreeNode {
        children: direct_children
            .into_iter()
            .map(|child| attach_children(child, children))
            .collect(),
        node,
    }
}

fn sort_siblings(nodes: &mut [MenuNode]) {
    nodes.sort_by(|left, right| {
        left.order
            .cmp(&right.order)
            .then_with(|| left.id.cmp(&right.id))
    });
}

/// Application service serving the navigation menu for the current caller.
#[derive(Clone)]
pub struct MenuService {
    repository: Arc<dyn MenuRepository>,
    authorization_service: AuthorizationService,
    config: MenuServiceConfig,
}

impl MenuService {
    /// Creates a menu service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn MenuRepository>,
        authorization_service: AuthorizationService,
        config: MenuServiceConfig,
    ) -> Self {
        Self {
            repository,
            authorization_service,
            config,
        }
    }

    /// Returns the configured orphan policy.
    #[must_use]
    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.config.orphan_policy
    }

    /// Returns the flat menu visible to the caller.
    ///
    /// Without an identity this fails with `Unauthorized` unless
    /// `permissive_if_anonymous` is enabled, in which case the full menu is
    /// returned.
    pub async fn visible_menu(&self, identity: Option<&UserIdentity>) -> AppResult<Vec<MenuNode>> {
        let Some(identity) = identity else {
            if !self.config.permissive_if_anonymous {
                return Err(AppError::Unauthorized(
                    "authentication required to read the menu".to_owned(),
                ));
            }

            let nodes = self.repository.list_active_menu_nodes().await?;
            warn!(
                menu_nodes = nodes.len(),
                "serving unfiltered menu to anonymous caller"
            );
            return Ok(filter_menu(nodes, MenuVisibility::Unrestricted));
        };

        let permissions = self
            .authorization_service
            .resolve_effective_permissions(identity.user_id(), identity.company_id())
            .await?;
        let nodes = self.repository.list_active_menu_nodes().await?;
        let visible = filter_menu(nodes, MenuVisibility::Restricted(&permissions));

        debug!(
            user_id = %identity.user_id(),
            company_id = %identity.company_id(),
            visible_nodes = visible.len(),
            "filtered menu"
        );

        Ok(visible)
    }

    /// Returns the menu visible to the caller as a tree.
    pub async fn visible_menu_tree(
        &self,
        identity: Option<&UserIdentity>,
    ) -> AppResult<Vec<MenuTreeNode>> {
        let visible = self.visible_menu(identity).await?;
        Ok(build_menu_tree(visible, self.config.orphan_policy))
    }
}
