use axum::Json;
use axum::extract::{Extension, State};
use tenantdesk_core::UserIdentity;

use crate::dto::{CompanyResponse, EffectivePermissionsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_my_companies_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<CompanyResponse>>> {
    let companies = state
        .company_repository
        .list_companies_for_user(user.user_id())
        .await?
        .iter()
        .map(|company| CompanyResponse::from_company(company, user.company_id()))
        .collect();

    Ok(Json(companies))
}

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<EffectivePermissionsResponse>> {
    let mut permissions: Vec<String> = state
        .authorization_service
        .resolve_effective_permissions(user.user_id(), user.company_id())
        .await?
        .into_iter()
        .collect();
    permissions.sort();

    Ok(Json(EffectivePermissionsResponse {
        company_id: user.company_id().as_i64(),
        permissions,
    }))
}
