//! Interfaces to the two external systems of record.
//!
//! The orchestrator keeps no state of its own. Child resource existence lives
//! in the [`ResourceStore`]; users, roles, workspaces and workspace-to-child
//! associations live in the [`IdentityStore`]. Neither trait offers
//! transactions across the two.

use crate::identity::{PolicyRule, Role, User, UserInvite};
use crate::resource::{ChildKind, ChildRef, DevopsProject, Namespace};
use crate::workspace::Workspace;
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// System of record for namespaces and devops projects.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace>;

    /// Create a devops project on behalf of `actor`. The returned project
    /// carries the store-assigned id, or none if the backend did not assign one.
    async fn create_devops_project(
        &self,
        actor: Option<&str>,
        project: DevopsProject,
    ) -> StoreResult<DevopsProject>;

    async fn delete_child(&self, actor: Option<&str>, child: &ChildRef) -> StoreResult<()>;

    /// Namespaces among `names` that exist; unknown names are skipped.
    async fn list_namespaces(&self, names: &[String]) -> StoreResult<Vec<Namespace>>;

    /// Devops projects among `ids` that exist; unknown ids are skipped.
    async fn list_devops_projects(&self, ids: &[String]) -> StoreResult<Vec<DevopsProject>>;
}

/// System of record for identities, roles, workspaces and bindings.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn create_workspace(&self, workspace: Workspace) -> StoreResult<Workspace>;
    async fn update_workspace(&self, workspace: Workspace) -> StoreResult<Workspace>;
    async fn delete_workspace(&self, name: &str) -> StoreResult<()>;
    async fn get_workspace(&self, name: &str) -> StoreResult<Workspace>;

    /// Workspaces whose name is in `names`, or every workspace when `names` is empty.
    async fn list_workspaces(&self, names: &[String]) -> StoreResult<Vec<Workspace>>;

    async fn bind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()>;
    async fn unbind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()>;

    /// Ids of the children of `kind` currently bound to `workspace`.
    async fn bound_children(&self, workspace: &str, kind: ChildKind) -> StoreResult<Vec<String>>;

    async fn get_user(&self, username: &str) -> StoreResult<User>;
    async fn workspace_members(&self, workspace: &str) -> StoreResult<Vec<User>>;

    async fn workspace_role_rules(
        &self,
        workspace: &str,
        role: &str,
    ) -> StoreResult<(Role, Vec<PolicyRule>)>;
    async fn workspace_role_users(&self, workspace: &str, role: &str) -> StoreResult<Vec<User>>;
    async fn workspace_roles(&self, workspace: &Workspace) -> StoreResult<Vec<Role>>;

    /// Grant every invite or none of them.
    async fn invite(&self, workspace: &str, invites: &[UserInvite]) -> StoreResult<()>;

    /// Revoke workspace membership; identities without membership are ignored.
    async fn remove_members(&self, workspace: &str, usernames: &[String]) -> StoreResult<()>;
}
