use async_trait::async_trait;

use tenantdesk_application::MenuRepository;
use tenantdesk_core::{AppError, AppResult};
use tenantdesk_domain::{MenuId, MenuNode};

use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for navigation menu rows.
#[derive(Clone)]
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuRow {
    id: i64,
    parent_id: Option<i64>,
    name: String,
    url: String,
    icon: Option<String>,
    sort_order: i32,
    permission_key: Option<String>,
    is_active: bool,
}

impl From<MenuRow> for MenuNode {
    fn from(row: MenuRow) -> Self {
        Self {
            id: MenuId::new(row.id),
            parent_id: MenuId::parent_from_nullable(row.parent_id),
            name: row.name,
            url: row.url,
            icon: row.icon,
            order: row.sort_order,
            permission_key: row.permission_key,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, parent_id, name, url, icon, sort_order, permission_key, is_active
            FROM menus
            WHERE is_active = TRUE
            ORDER BY COALESCE(parent_id, 0), sort_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menu nodes: {error}")))?;

        Ok(rows.into_iter().map(MenuNode::from).collect())
    }
}
