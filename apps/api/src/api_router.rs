use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use tenantdesk_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/me/companies",
            get(handlers::me::list_my_companies_handler),
        )
        .route("/api/me/company", put(auth::switch_company_handler))
        .route(
            "/api/me/permissions",
            get(handlers::me::my_permissions_handler),
        )
        .route(
            "/api/security/permissions",
            get(handlers::security::list_permission_catalog_handler),
        )
        .route(
            "/api/security/users/{user_id}/companies/{company_id}/authorization",
            get(handlers::security::authorization_summary_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route("/api/menus", get(handlers::menus::list_menu_handler))
        .route("/api/menus/tree", get(handlers::menus::menu_tree_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state);

    Ok(app)
}
