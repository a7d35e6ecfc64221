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
use workspace_orchestrator::Namespace;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{BASE_PATH}/{{name}}/namespaces"),
            get(list_namespaces).post(create_namespace),
        )
        .route(
            &format!("{BASE_PATH}/{{name}}/namespaces/{{namespace}}"),
            delete(delete_namespace),
        )
}

async fn list_namespaces(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
) -> ApiResult<Json<Vec<Namespace>>> {
    let namespaces = state.orchestrator.bindings().list_namespaces(&workspace).await?;

    Ok(Json(namespaces))
}

async fn create_namespace(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    payload: Result<Json<Namespace>, JsonRejection>,
) -> ApiResult<Json<Namespace>> {
    let Json(namespace) = payload?;

    let namespace = state
        .orchestrator
        .bindings()
        .create_namespace(&workspace, Some(&user.username), namespace)
        .await?;

    Ok(Json(namespace))
}

async fn delete_namespace(
    State(state): State<AppState>,
    Path((workspace, namespace)): Path<(String, String)>,
    query: Result<Query<ForceQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = query?;

    state
        .orchestrator
        .bindings()
        .delete_namespace(&workspace, &namespace, query.is_forced())
        .await?;

    Ok(MessageResponse::success())
}
