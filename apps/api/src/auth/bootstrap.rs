use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tenantdesk_core::{AppError, CompanyId, UserId, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::BootstrapRequest;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, store_identity};

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = UserId::from_transport(payload.user_id)?;
    let company_id = match payload.company_id {
        Some(company_id) => {
            let company_id = CompanyId::from_transport(company_id)?;
            if !state
                .company_repository
                .is_member(user_id, company_id)
                .await?
            {
                return Err(AppError::Forbidden(format!(
                    "user '{user_id}' is not a member of company '{company_id}'"
                ))
                .into());
            }
            company_id
        }
        None => state
            .company_repository
            .list_companies_for_user(user_id)
            .await?
            .first()
            .map(|company| company.id())
            .ok_or_else(|| {
                AppError::Forbidden(format!("user '{user_id}' does not belong to any company"))
            })?,
    };

    let display_name = payload
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("user {user_id}"));
    let identity = UserIdentity::new(user_id, display_name, payload.email, company_id);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    store_identity(&session, &identity).await?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(%user_id, %company_id, "bootstrap sign-in");

    Ok(StatusCode::NO_CONTENT)
}
