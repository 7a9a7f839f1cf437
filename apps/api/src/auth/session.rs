use axum::Json;
use axum::http::StatusCode;
use tenantdesk_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;

use super::session_identity;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let user_id = session_identity(&session)
        .await?
        .map(|identity| identity.user_id());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(user_id) = user_id {
        info!(%user_id, "signed out");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(session: Session) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(UserIdentityResponse::from(identity)))
}
