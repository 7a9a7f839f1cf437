use std::sync::Arc;

use sqlx::PgPool;
use tenantdesk_application::{AuthorizationService, CompanyRepository, MenuService};
use tenantdesk_infrastructure::{
    PostgresAccessRepository, PostgresCompanyRepository, PostgresMenuRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let authorization_service =
        AuthorizationService::new(Arc::new(PostgresAccessRepository::new(pool.clone())));
    let menu_service = MenuService::new(
        Arc::new(PostgresMenuRepository::new(pool.clone())),
        authorization_service.clone(),
        config.menu,
    );
    let company_repository: Arc<dyn CompanyRepository> =
        Arc::new(PostgresCompanyRepository::new(pool));

    AppState {
        authorization_service,
        menu_service,
        company_repository,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
