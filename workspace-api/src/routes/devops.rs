use super::{ForceQuery, MessageResponse, BASE_PATH};
use crate::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use workspace_orchestrator::DevopsProject;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{BASE_PATH}/{{name}}/devops"),
            get(list_devops_projects).post(create_devops_project),
        )
        .route(
            &format!("{BASE_PATH}/{{name}}/devops/{{id}}"),
            delete(delete_devops_project),
        )
}

async fn list_devops_projects(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
) -> ApiResult<Json<Vec<DevopsProject>>> {
    let projects = state
        .orchestrator
        .bindings()
        .list_devops_projects(&workspace)
        .await?;

    Ok(Json(projects))
}

async fn create_devops_project(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    payload: Result<Json<DevopsProject>, JsonRejection>,
) -> ApiResult<Json<DevopsProject>> {
    let Json(project) = payload?;

    let project = state
        .orchestrator
        .bindings()
        .create_devops_project(&workspace, Some(&user.username), project)
        .await?;

    Ok(Json(project))
}

async fn delete_devops_project(
    State(state): State<AppState>,
    Path((workspace, id)): Path<(String, String)>,
    query: Result<Query<ForceQuery>, QueryRejection>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = query?;

    state
        .orchestrator
        .bindings()
        .delete_devops_project(&workspace, Some(&user.username), &id, query.is_forced())
        .await?;

    Ok(MessageResponse::success())
}
