use super::BASE_PATH;
use crate::{error::ApiResult, state::AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use workspace_orchestrator::{Role, RoleDetail};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&format!("{BASE_PATH}/{{name}}/roles"), get(list_roles))
        .route(
            &format!("{BASE_PATH}/{{name}}/roles/{{role}}"),
            get(get_role),
        )
}

async fn list_roles(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
) -> ApiResult<Json<Vec<Role>>> {
    let roles = state.orchestrator.roles().list_roles(&workspace).await?;

    Ok(Json(roles))
}

async fn get_role(
    State(state): State<AppState>,
    Path((workspace, role)): Path<(String, String)>,
) -> ApiResult<Json<RoleDetail>> {
    let detail = state
        .orchestrator
        .roles()
        .role_detail(&workspace, &role)
        .await?;

    Ok(Json(detail))
}
