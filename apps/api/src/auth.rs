use tenantdesk_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

mod bootstrap;
mod company;
mod session;

pub use bootstrap::bootstrap_handler;
pub use company::switch_company_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Sessions older than this are signed out regardless of activity.
pub const SESSION_ABSOLUTE_LIFETIME_SECONDS: i64 = 12 * 60 * 60;

/// Reads the identity stored in the session, if any.
///
/// A session past its absolute lifetime, or without a creation time, is
/// flushed and reads as anonymous.
pub async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;
    let Some(identity) = identity else {
        return Ok(None);
    };

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session creation time: {error}"))
        })?;

    if !within_absolute_lifetime(created_at, chrono::Utc::now().timestamp()) {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;
        info!(user_id = %identity.user_id(), "session reached absolute lifetime");
        return Ok(None);
    }

    Ok(Some(identity))
}

fn within_absolute_lifetime(created_at: Option<i64>, now: i64) -> bool {
    created_at.is_some_and(|created_at| now - created_at < SESSION_ABSOLUTE_LIFETIME_SECONDS)
}

async fn store_identity(session: &Session, identity: &UserIdentity) -> Result<(), AppError> {
    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session identity: {error}")))
}
