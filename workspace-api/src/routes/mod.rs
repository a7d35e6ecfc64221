pub mod devops;
pub mod health;
pub mod members;
pub mod namespaces;
pub mod roles;
pub mod workspaces;

use crate::{api_docs::ApiDoc, auth::auth_middleware, state::AppState};
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use workspace_orchestrator::WorkspaceOrchestrator;

pub const BASE_PATH: &str = "/api/v1alpha/workspaces";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn success() -> Json<Self> {
        Json(Self {
            message: "success".to_string(),
        })
    }
}

/// `?name=a,b` filter used by the list and remove endpoints
#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// `?force=true` override on child deletes; any other value means not forced
#[derive(Debug, Default, Deserialize)]
pub struct ForceQuery {
    pub force: Option<String>,
}

impl ForceQuery {
    pub fn is_forced(&self) -> bool {
        self.force.as_deref() == Some("true")
    }
}

pub fn create_app(orchestrator: WorkspaceOrchestrator) -> Router {
    let state = AppState::new(orchestrator);

    // Allow CORS for local development (frontend on different port)
    let cors = CorsLayer::permissive();

    Router::new()
        .merge(health::routes()) // Health routes don't need auth
        .route("/api-docs/openapi.json", get(openapi_spec))
        .merge(
            workspaces::routes()
                .merge(namespaces::routes())
                .merge(devops::routes())
                .merge(members::routes())
                .merge(roles::routes())
                .layer(middleware::from_fn(auth_middleware)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
