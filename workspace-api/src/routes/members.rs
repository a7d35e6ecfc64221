use super::{MessageResponse, NameQuery, BASE_PATH};
use crate::{error::ApiResult, state::AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use workspace_orchestrator::workspace::parse_name_filter;
use workspace_orchestrator::{MemberView, UserInvite};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{BASE_PATH}/{{name}}/members"),
            get(list_members).post(invite_members).delete(remove_members),
        )
        .route(
            &format!("{BASE_PATH}/{{name}}/members/{{member}}"),
            get(get_member),
        )
}

async fn list_members(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
) -> ApiResult<Json<Vec<MemberView>>> {
    let members = state.orchestrator.members().list_members(&workspace).await?;

    Ok(Json(members))
}

async fn get_member(
    State(state): State<AppState>,
    Path((workspace, member)): Path<(String, String)>,
) -> ApiResult<Json<MemberView>> {
    let member = state
        .orchestrator
        .members()
        .get_member(&workspace, &member)
        .await?;

    Ok(Json(member))
}

async fn invite_members(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
    payload: Result<Json<Vec<UserInvite>>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(invites) = payload?;

    state
        .orchestrator
        .members()
        .invite(&workspace, &invites)
        .await?;

    Ok(MessageResponse::success())
}

async fn remove_members(
    State(state): State<AppState>,
    Path(workspace): Path<String>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = query?;

    let names = query
        .name
        .as_deref()
        .map(parse_name_filter)
        .unwrap_or_default();

    state
        .orchestrator
        .members()
        .remove_members(&workspace, &names)
        .await?;

    Ok(MessageResponse::success())
}
