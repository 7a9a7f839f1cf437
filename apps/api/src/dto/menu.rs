use serde::Serialize;
use tenantdesk_domain::{MenuNode, MenuTreeNode};
use ts_rs::TS;

/// Navigation node visible to the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-node-response.ts"
)]
pub struct MenuNodeResponse {
    #[ts(type = "number")]
    pub id: i64,
    /// `0` for top-level nodes.
    #[ts(type = "number")]
    pub parent_id: i64,
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub order: i32,
    pub permission_key: Option<String>,
}

impl From<MenuNode> for MenuNodeResponse {
    fn from(node: MenuNode) -> Self {
        Self {
            id: node.id.as_i64(),
            parent_id: node.parent_id.as_i64(),
            name: node.name,
            url: node.url,
            icon: node.icon,
            order: node.order,
            permission_key: node.permission_key,
        }
    }
}

/// Navigation node with its visible children.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-tree-node-response.ts"
)]
pub struct MenuTreeNodeResponse {
    pub node: MenuNodeResponse,
    pub children: Vec<MenuTreeNodeResponse>,
}

impl From<MenuTreeNode> for MenuTreeNodeResponse {
    fn from(entry: MenuTreeNode) -> Self {
        Self {
            node: MenuNodeResponse::from(entry.node),
            children: entry
                .children
                .into_iter()
                .map(MenuTreeNodeResponse::from)
                .collect(),
        }
    }
}
