use std::sync::Arc;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tenantdesk_application::{AccessRepository, AuthorizationService};
use tenantdesk_core::{CompanyId, UserId};

use super::{
    PermissionRow, PostgresAccessRepository, RoleRow, decode_permissions, decode_roles,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres access tests: {error}");
    }

    Some(pool)
}

async fn insert_returning_id(pool: &PgPool, sql: &str, text: &str) -> i64 {
    let inserted = sqlx::query_scalar::<_, i64>(sql)
        .bind(text)
        .fetch_one(pool)
        .await;

    match inserted {
        Ok(id) => id,
        Err(error) => panic!("failed to insert fixture '{text}': {error}"),
    }
}

async fn insert_link(pool: &PgPool, sql: &str, ids: [i64; 3], flag: bool) {
    let result = sqlx::query(sql)
        .bind(ids[0])
        .bind(ids[1])
        .bind(ids[2])
        .bind(flag)
        .execute(pool)
        .await;

    assert!(result.is_ok());
}

struct Fixture {
    user_id: i64,
    company_id: i64,
    view_key: String,
    delete_key: String,
}

/// Manager role grants view and delete; delete is denied directly.
async fn seed_manager(pool: &PgPool) -> Fixture {
    let user_id = insert_returning_id(
        pool,
        "INSERT INTO users (display_name) VALUES ($1) RETURNING id",
        "Access Tester",
    )
    .await;
    let company_id = insert_returning_id(
        pool,
        "INSERT INTO companies (name) VALUES ($1) RETURNING id",
        "Access Company",
    )
    .await;
    let role_id = insert_returning_id(
        pool,
        "INSERT INTO roles (name) VALUES ($1) RETURNING id",
        "Manager",
    )
    .await;

    let view_key = format!("inventory{user_id}.view");
    let delete_key = format!("inventory{user_id}.delete");
    let permission_sql = "INSERT INTO permissions (key, name) VALUES ($1, $1) RETURNING id";
    let view_id = insert_returning_id(pool, permission_sql, view_key.as_str()).await;
    let delete_id = insert_returning_id(pool, permission_sql, delete_key.as_str()).await;

    let membership =
        sqlx::query("INSERT INTO company_memberships (user_id, company_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(company_id)
            .execute(pool)
            .await;
    assert!(membership.is_ok());

    for permission_id in [view_id, delete_id] {
        let grant = sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id, is_allowed) VALUES ($1, $2, TRUE)",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(pool)
        .await;
        assert!(grant.is_ok());
    }

    insert_link(
        pool,
        r#"
        INSERT INTO user_company_roles (user_id, company_id, role_id, is_active)
        VALUES ($1, $2, $3, $4)
        "#,
        [user_id, company_id, role_id],
        true,
    )
    .await;
    insert_link(
        pool,
        r#"
        INSERT INTO user_company_permissions (user_id, company_id, permission_id, is_allowed)
        VALUES ($1, $2, $3, $4)
        "#,
        [user_id, company_id, delete_id],
        false,
    )
    .await;

    Fixture {
        user_id,
        company_id,
        view_key,
        delete_key,
    }
}

#[tokio::test]
async fn resolver_applies_direct_deny_over_stored_role_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let fixture = seed_manager(&pool).await;
    let service = AuthorizationService::new(Arc::new(PostgresAccessRepository::new(pool)));

    let effective = service
        .resolve_effective_permissions(
            UserId::new(fixture.user_id),
            CompanyId::new(fixture.company_id),
        )
        .await;

    assert!(effective.is_ok());
    let effective = effective.unwrap_or_default();
    assert!(effective.contains(fixture.view_key.as_str()));
    assert!(!effective.contains(fixture.delete_key.as_str()));
}

#[tokio::test]
async fn assignments_do_not_leak_into_other_companies() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let fixture = seed_manager(&pool).await;
    let repository = PostgresAccessRepository::new(pool);

    let roles = repository
        .list_user_company_roles(
            UserId::new(fixture.user_id),
            CompanyId::new(fixture.company_id + 100_000),
        )
        .await;

    assert!(roles.is_ok());
    assert!(roles.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn empty_role_id_list_skips_the_query() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessRepository::new(pool);
    let grants = repository.list_role_permissions(&[]).await;

    assert!(grants.is_ok());
    assert!(grants.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn seeded_system_permissions_are_listed() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAccessRepository::new(pool);
    let permissions = repository.list_permissions().await;

    assert!(permissions.is_ok());
    let permissions = permissions.unwrap_or_default();
    assert!(
        permissions
            .iter()
            .any(|permission| permission.key().as_str() == "security.authorization.read")
    );
}

#[test]
fn malformed_role_rows_are_skipped() {
    let roles = decode_roles(vec![
        RoleRow {
            id: 1,
            name: "Manager".to_owned(),
            is_active: true,
        },
        RoleRow {
            id: 2,
            name: "   ".to_owned(),
            is_active: true,
        },
    ]);

    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name(), "Manager");
}

#[test]
fn malformed_permission_rows_are_skipped() {
    let permissions = decode_permissions(vec![
        PermissionRow {
            id: 10,
            key: "inventory.view".to_owned(),
            name: "View inventory".to_owned(),
            is_active: true,
        },
        PermissionRow {
            id: 11,
            key: "inventory view".to_owned(),
            name: "Broken".to_owned(),
            is_active: true,
        },
        PermissionRow {
            id: 12,
            key: String::new(),
            name: "Empty".to_owned(),
            is_active: true,
        },
    ]);

    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].key().as_str(), "inventory.view");
}

#[tokio::test]
async fn catalog_rejects_rows_the_domain_cannot_decode() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let fixture = seed_manager(&pool).await;

    let blank_role = sqlx::query("INSERT INTO roles (name) VALUES ($1)")
        .bind("  ")
        .execute(&pool)
        .await;
    assert!(blank_role.is_err());

    let spaced_key = sqlx::query("INSERT INTO permissions (key, name) VALUES ($1, $1)")
        .bind(format!("inventory{} broken", fixture.user_id))
        .execute(&pool)
        .await;
    assert!(spaced_key.is_err());

    let service = AuthorizationService::new(Arc::new(PostgresAccessRepository::new(pool)));
    let effective = service
        .resolve_effective_permissions(
            UserId::new(fixture.user_id),
            CompanyId::new(fixture.company_id),
        )
        .await;

    assert!(effective.is_ok());
    assert!(effective.unwrap_or_default().contains(fixture.view_key.as_str()));
}
