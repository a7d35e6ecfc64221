use super::{MessageResponse, NameQuery, BASE_PATH};
use crate::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use workspace_orchestrator::workspace::parse_name_filter;
use workspace_orchestrator::Workspace;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(BASE_PATH, get(list_workspaces).post(create_workspace))
        .route(
            &format!("{BASE_PATH}/{{name}}"),
            get(get_workspace)
                .put(edit_workspace)
                .delete(delete_workspace),
        )
}

async fn list_workspaces(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Workspace>>> {
    let Query(query) = query?;

    let names = query
        .name
        .as_deref()
        .map(parse_name_filter)
        .unwrap_or_default();

    let workspaces = state.orchestrator.workspaces().list_workspaces(&names).await?;

    Ok(Json(workspaces))
}

async fn create_workspace(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    payload: Result<Json<Workspace>, JsonRejection>,
) -> ApiResult<Json<Workspace>> {
    let Json(workspace) = payload?;

    // Creator always comes from the authenticated user
    let workspace = state
        .orchestrator
        .workspaces()
        .create_workspace(Some(&user.username), workspace)
        .await?;

    Ok(Json(workspace))
}

async fn get_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Workspace>> {
    let workspace = state.orchestrator.workspaces().get_workspace(&name).await?;

    Ok(Json(workspace))
}

async fn edit_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<Workspace>, JsonRejection>,
) -> ApiResult<Json<Workspace>> {
    let Json(workspace) = payload?;

    let workspace = state
        .orchestrator
        .workspaces()
        .edit_workspace(&name, workspace)
        .await?;

    Ok(Json(workspace))
}

async fn delete_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.orchestrator.workspaces().delete_workspace(&name).await?;

    Ok(MessageResponse::success())
}
