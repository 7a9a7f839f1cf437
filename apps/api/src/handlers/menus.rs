use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::auth::session_identity;
use crate::dto::{MenuNodeResponse, MenuTreeNodeResponse};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_menu_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<MenuNodeResponse>>> {
    let identity = session_identity(&session).await?;

    let nodes = state
        .menu_service
        .visible_menu(identity.as_ref())
        .await?
        .into_iter()
        .map(MenuNodeResponse::from)
        .collect();

    Ok(Json(nodes))
}

pub async fn menu_tree_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<MenuTreeNodeResponse>>> {
    let identity = session_identity(&session).await?;

    let tree = state
        .menu_service
        .visible_menu_tree(identity.as_ref())
        .await?
        .into_iter()
        .map(MenuTreeNodeResponse::from)
        .collect();

    Ok(Json(tree))
}
