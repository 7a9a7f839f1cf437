use axum::Json;
use axum::extract::{Extension, State};
use tenantdesk_core::{AppError, CompanyId, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{SwitchCompanyRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::store_identity;


pub async fn switch_company_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    session: Session,
    Json(payload): Json<SwitchCompanyRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let company_id = CompanyId::from_transport(payload.company_id)?;

    if !state
        .company_repository
        .is_member(user.user_id(), company_id)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "company '{company_id}' was not found for user '{}'",
            user.user_id()
        ))
        .into());
    }

    let identity = user.with_company(company_id);
    store_identity(&session, &identity).await?;

    info!(user_id = %identity.user_id(), %company_id, "switched company");

    Ok(Json(UserIdentityResponse::from(identity)))
}
