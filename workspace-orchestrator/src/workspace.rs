use crate::error::{OrchestratorError, Result};
use crate::store::IdentityStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Reserved separator; identity-store keys are built as `workspace:child`.
pub const NAME_SEPARATOR: char = ':';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Workspace {
    pub name: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub creator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Never persisted through this type; membership goes through the
    /// membership service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

pub fn validate_workspace_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(NAME_SEPARATOR) {
        return Err(OrchestratorError::InvalidInput(
            "invalid workspace name".to_string(),
        ));
    }

    Ok(())
}

/// Split a comma-separated `name` filter, dropping blank entries.
pub fn parse_name_filter(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create, edit, delete and read workspaces.
#[derive(Clone)]
pub struct WorkspaceLifecycle {
    identity: Arc<dyn IdentityStore>,
}

impl WorkspaceLifecycle {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self { identity }
    }

    /// Create a new workspace owned by `actor`
    #[instrument(skip(self, workspace), fields(workspace = %workspace.name))]
    pub async fn create_workspace(
        &self,
        actor: Option<&str>,
        mut workspace: Workspace,
    ) -> Result<Workspace> {
        validate_workspace_name(&workspace.name)?;

        workspace.path = workspace.name.clone();
        workspace.members.clear();
        workspace.creator = actor.unwrap_or_default().to_string();
        workspace.created_at = Some(Utc::now());

        let created = self.identity.create_workspace(workspace).await?;
        info!(creator = %created.creator, "workspace created");

        Ok(created)
    }

    /// Edit a workspace; `name` is the name the caller addressed it by
    #[instrument(skip(self, workspace))]
    pub async fn edit_workspace(&self, name: &str, mut workspace: Workspace) -> Result<Workspace> {
        if name != workspace.name {
            return Err(OrchestratorError::InvalidInput(format!(
                "the name of workspace ({}) does not match the name on the URL ({})",
                workspace.name, name
            )));
        }

        validate_workspace_name(&workspace.name)?;

        workspace.path = workspace.name.clone();
        workspace.members.clear();

        let edited = self.identity.update_workspace(workspace).await?;
        info!("workspace edited");

        Ok(edited)
    }

    /// Delete a workspace. Bound children are left for the caller to unbind.
    #[instrument(skip(self))]
    pub async fn delete_workspace(&self, name: &str) -> Result<()> {
        validate_workspace_name(name)?;

        let workspace = self.identity.get_workspace(name).await?;
        self.identity.delete_workspace(&workspace.name).await?;
        info!("workspace deleted");

        Ok(())
    }

    pub async fn get_workspace(&self, name: &str) -> Result<Workspace> {
        Ok(self.identity.get_workspace(name).await?)
    }

    /// List workspaces, optionally restricted to `names`
    pub async fn list_workspaces(&self, names: &[String]) -> Result<Vec<Workspace>> {
        Ok(self.identity.list_workspaces(names).await?)
    }
}
