use async_trait::async_trait;

use tenantdesk_application::CompanyRepository;
use tenantdesk_core::{AppError, AppResult, CompanyId, UserId};
use tenantdesk_domain::Company;

use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for company membership lookups.
#[derive(Clone)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: i64,
    name: String,
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn is_member(&self, user_id: UserId, company_id: CompanyId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM company_memberships
                WHERE user_id = $1
                    AND company_id = $2
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(company_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check membership of user '{user_id}' in company '{company_id}': {error}"
            ))
        })
    }

    async fn list_companies_for_user(&self, user_id: UserId) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT companies.id, companies.name
            FROM company_memberships AS memberships
            INNER JOIN companies
                ON companies.id = memberships.company_id
            WHERE memberships.user_id = $1
            ORDER BY companies.name, companies.id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list companies of user '{user_id}': {error}"
            ))
        })?;

        rows.into_iter()
            .map(|row| {
                Company::new(CompanyId::new(row.id), row.name).map_err(|error| {
                    AppError::Internal(format!("failed to decode company '{}': {error}", row.id))
                })
            })
            .collect()
    }
}
