use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tenantdesk_core::AppError;
use tower_sessions::Session;

use crate::auth::session_identity;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        check_origin(request.headers(), state.frontend_url.as_str())?;
    }

    Ok(next.run(request).await)
}

fn check_origin(headers: &HeaderMap, allowed_origin: &str) -> Result<(), AppError> {
    if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
        return Err(AppError::Unauthorized("cross-site request blocked".to_owned()));
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if origin != allowed_origin && !referer.starts_with(allowed_origin) {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()));
    }

    Ok(())
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, Method, header};

    use super::{check_origin, is_state_changing_method};

    const FRONTEND: &str = "http://localhost:3000";

    #[test]
    fn only_mutations_are_origin_checked() {
        assert!(is_state_changing_method(&Method::PUT));
        assert!(is_state_changing_method(&Method::POST));
        assert!(!is_state_changing_method(&Method::GET));
    }

    #[test]
    fn matching_origin_or_referer_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        assert!(check_origin(&headers, FRONTEND).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:3000/settings"),
        );
        assert!(check_origin(&headers, FRONTEND).is_ok());
    }

    #[test]
    fn foreign_or_cross_site_requests_are_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://evil.test"));
        assert!(check_origin(&headers, FRONTEND).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
        assert!(check_origin(&headers, FRONTEND).is_err());
    }
}
