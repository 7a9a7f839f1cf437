use async_trait::async_trait;

use tenantdesk_application::AccessRepository;
use tenantdesk_core::{AppError, AppResult, CompanyId, UserId};
use tenantdesk_domain::{
    Permission, PermissionId, Role, RoleId, RolePermission, UserCompanyPermission,
    UserCompanyRole,
};

use sqlx::{FromRow, PgPool};
use tracing::warn;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for role and permission rows.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: i64,
    key: String,
    name: String,
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: i64,
    permission_id: i64,
    is_allowed: bool,
}

#[derive(Debug, FromRow)]
struct UserCompanyRoleRow {
    role_id: i64,
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct UserCompanyPermissionRow {
    permission_id: i64,
    is_allowed: bool,
}

/// Decodes role rows, skipping rows the domain rejects.
fn decode_roles(rows: Vec<RoleRow>) -> Vec<Role> {
    rows.into_iter()
        .filter_map(|row| {
            let role_id = row.id;
            Role::new(RoleId::new(row.id), row.name, row.is_active)
                .map_err(|error| {
                    warn!(role_id, %error, "skipping malformed role row");
                })
                .ok()
        })
        .collect()
}

/// Decodes permission rows, skipping rows the domain rejects.
fn decode_permissions(rows: Vec<PermissionRow>) -> Vec<Permission> {
    rows.into_iter()
        .filter_map(|row| {
            let permission_id = row.id;
            Permission::new(PermissionId::new(row.id), row.key, row.name, row.is_active)
                .map_err(|error| {
                    warn!(permission_id, %error, "skipping malformed permission row");
                })
                .ok()
        })
        .collect()
}

#[async_trait]
impl AccessRepository for PostgresAccessRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, is_active
            FROM roles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(decode_roles(rows))
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, key, name, is_active
            FROM permissions
            ORDER BY key
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        Ok(decode_permissions(rows))
    }

    async fn list_user_company_roles(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyRole>> {
        let rows = sqlx::query_as::<_, UserCompanyRoleRow>(
            r#"
            SELECT role_id, is_active
            FROM user_company_roles
            WHERE user_id = $1
                AND company_id = $2
            ORDER BY role_id
            "#,
        )
        .bind(user_id.as_i64())
        .bind(company_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list roles of user '{user_id}' in company '{company_id}': {error}"
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| UserCompanyRole {
                user_id,
                company_id,
                role_id: RoleId::new(row.role_id),
                is_active: row.is_active,
            })
            .collect())
    }

    async fn list_role_permissions(&self, role_ids: &[RoleId]) -> AppResult<Vec<RolePermission>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<i64> = role_ids.iter().map(RoleId::as_i64).collect();
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT role_id, permission_id, is_allowed
            FROM role_permissions
            WHERE role_id = ANY($1)
            ORDER BY role_id, permission_id
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| RolePermission {
                role_id: RoleId::new(row.role_id),
                permission_id: PermissionId::new(row.permission_id),
                is_allowed: row.is_allowed,
            })
            .collect())
    }

    async fn list_user_company_permissions(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserCompanyPermission>> {
        let rows = sqlx::query_as::<_, UserCompanyPermissionRow>(
            r#"
            SELECT permission_id, is_allowed
            FROM user_company_permissions
            WHERE user_id = $1
                AND company_id = $2
            ORDER BY permission_id
            "#,
        )
        .bind(user_id.as_i64())
        .bind(company_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list direct permissions of user '{user_id}' in company '{company_id}': {error}"
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| UserCompanyPermission {
                user_id,
                company_id,
                permission_id: PermissionId::new(row.permission_id),
                is_allowed: row.is_allowed,
            })
            .collect())
    }
}
