//! Common test utilities and helpers for workspace-api tests
//!
//! Builds the router on top of fault-injecting in-memory stores so tests can
//! both drive the HTTP surface and reach into the stores.

#![allow(dead_code)]

use axum::Router;
use std::sync::Arc;
use workspace_orchestrator::test_utils::{FaultyIdentityStore, FaultyResourceStore};
use workspace_orchestrator::{User, WorkspaceOrchestrator, WorkspaceRoles};

pub const BASE: &str = "/api/v1alpha/workspaces";

pub struct TestStores {
    pub resources: Arc<FaultyResourceStore>,
    pub identity: Arc<FaultyIdentityStore>,
}

impl TestStores {
    pub fn new() -> Self {
        Self {
            resources: Arc::new(FaultyResourceStore::default()),
            identity: Arc::new(FaultyIdentityStore::default()),
        }
    }

    pub fn orchestrator(&self) -> WorkspaceOrchestrator {
        WorkspaceOrchestrator::new(
            self.resources.clone(),
            self.identity.clone(),
            WorkspaceRoles::default(),
        )
    }

    pub async fn add_user(&self, username: &str) {
        self.identity.inner().insert_user(User::new(username)).await;
    }
}

/// Helper to extract JSON body from axum response
pub async fn extract_json_body<T>(response: axum::response::Response) -> T
where
    T: serde::de::DeserializeOwned,
{
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    serde_json::from_slice(&body).expect("Failed to deserialize JSON")
}

/// Helper to create authenticated request headers
pub fn auth_headers(username: &str) -> Vec<(&'static str, &str)> {
    vec![("x-token-username", username)]
}

/// TestClient to encapsulate API interaction logic
pub struct TestClient {
    pub app: Router,
    pub stores: TestStores,
}

impl TestClient {
    /// Create a new TestClient over fresh stores
    pub fn new() -> Self {
        let stores = TestStores::new();
        let app = workspace_api::create_app(stores.orchestrator());
        Self { app, stores }
    }

    /// Send a request to the API
    pub async fn send_request(
        &self,
        request: axum::http::Request<axum::body::Body>,
    ) -> axum::http::Response<axum::body::Body> {
        // Clone the app to allow reuse (Router is cheap to clone)
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        method: &str,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        let req_body = serde_json::to_string(body).expect("Failed to serialize request body");
        let mut builder = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");

        if let Some(h) = headers {
            for (k, v) in h {
                builder = builder.header(k, v);
            }
        }

        let request = builder.body(axum::body::Body::from(req_body)).unwrap();
        self.send_request(request).await
    }

    /// Post JSON to an endpoint
    pub async fn post<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_json("POST", uri, body, headers).await
    }

    /// Put JSON to an endpoint
    pub async fn put<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_json("PUT", uri, body, headers).await
    }

    /// Get request to an endpoint
    pub async fn get(
        &self,
        uri: &str,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_empty("GET", uri, headers).await
    }

    /// Delete request to an endpoint
    pub async fn delete(
        &self,
        uri: &str,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_empty("DELETE", uri, headers).await
    }

    async fn send_empty(
        &self,
        method: &str,
        uri: &str,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);

        if let Some(h) = headers {
            for (k, v) in h {
                builder = builder.header(k, v);
            }
        }

        let request = builder.body(axum::body::Body::empty()).unwrap();
        self.send_request(request).await
    }

    /// Fixture: create a workspace as `owner`
    pub async fn fixture_workspace(&self, name: &str, owner: &str) {
        let response = self
            .post(
                BASE,
                &serde_json::json!({ "name": name }),
                Some(auth_headers(owner)),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
