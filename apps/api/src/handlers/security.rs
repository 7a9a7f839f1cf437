use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use tenantdesk_application::SummaryOptions;
use tenantdesk_core::{AppError, CompanyId, UserId, UserIdentity};
use tenantdesk_domain::SystemPermission;

use crate::dto::{AuthorizationSummaryQuery, AuthorizationSummaryResponse, PermissionModuleResponse};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_permission_catalog_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionModuleResponse>>> {
    state
        .authorization_service
        .require_permission(&user, SystemPermission::SecurityPermissionRead)
        .await?;

    let groups = state
        .authorization_service
        .list_permission_catalog()
        .await?
        .into_iter()
        .map(PermissionModuleResponse::from)
        .collect();

    Ok(Json(groups))
}

pub async fn authorization_summary_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, company_id)): Path<(i64, i64)>,
    Query(query): Query<AuthorizationSummaryQuery>,
) -> ApiResult<Json<AuthorizationSummaryResponse>> {
    state
        .authorization_service
        .require_permission(&user, SystemPermission::SecurityAuthorizationRead)
        .await?;

    let user_id = UserId::from_transport(user_id)?;
    let company_id = CompanyId::from_transport(company_id)?;

    if !state
        .company_repository
        .is_member(user_id, company_id)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "user '{user_id}' has no membership in company '{company_id}'"
        ))
        .into());
    }

    let summary = state
        .authorization_service
        .build_authorization_summary(
            user_id,
            company_id,
            SummaryOptions {
                include_denied: query.include_denied,
            },
        )
        .await?;

    Ok(Json(AuthorizationSummaryResponse::from(summary)))
}
