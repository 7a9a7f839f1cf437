use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tenantdesk_core::AppError;

/// Menu node identifier. `MenuId::ROOT` (0) marks top-level nodes as parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(i64);

impl MenuId {
    /// Parent id carried by top-level nodes.
    pub const ROOT: Self = Self(0);

    /// Creates a menu identifier from a stored integer key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Maps a nullable stored parent column onto an id, `NULL` being the root.
    #[must_use]
    pub fn parent_from_nullable(value: Option<i64>) -> Self {
        value.map(Self).unwrap_or(Self::ROOT)
    }

    /// Returns the underlying integer key.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns whether this id denotes the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 <= 0
    }
}

impl Display for MenuId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Navigation node, optionally gated by a permission key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Unique node id.
    pub id: MenuId,
    /// Parent node id, [`MenuId::ROOT`] for top-level nodes.
    pub parent_id: MenuId,
    /// Display label.
    pub name: String,
    /// Navigation target.
    pub url: String,
    /// Optional icon name.
    pub icon: Option<String>,
    /// Position among siblings.
    pub order: i32,
    /// Permission key required to see the node.
    pub permission_key: Option<String>,
    /// Inactive nodes are never shown.
    pub is_active: bool,
}

impl MenuNode {
    /// Returns the gating key, treating blank keys as absent.
    #[must_use]
    pub fn gating_key(&self) -> Option<&str> {
        self.permission_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Menu node with its visible children materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTreeNode {
    /// The node itself.
    pub node: MenuNode,
    /// Visible children ordered by (order, id).
    pub children: Vec<MenuTreeNode>,
}

/// Placement of visible nodes whose parent is not part of the visible set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Orphans become top-level entries.
    #[default]
    AttachToRoot,
    /// Orphans and their descendants are left out of the tree.
    Drop,
}

impl OrphanPolicy {
    /// Returns the stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttachToRoot => "attach_to_root",
            Self::Drop => "drop",
        }
    }
}

impl FromStr for OrphanPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "attach_to_root" => Ok(Self::AttachToRoot),
            "drop" => Ok(Self::Drop),
            other => Err(AppError::Validation(format!(
                "menu orphan policy must be 'attach_to_root' or 'drop', got '{other}'"
            ))),
        }
    }
}
