//! Child resources that can be bound to a workspace.

use crate::error::{OrchestratorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// Annotation naming the identity that created a namespace through a workspace.
pub const CREATOR_ANNOTATION: &str = "creator";

/// Annotation naming the workspace a namespace belongs to.
pub const WORKSPACE_ANNOTATION: &str = "workspace";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Namespace {
    pub name: String,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Stamp the workspace metadata a bound namespace must carry.
    pub fn annotate(&mut self, creator: Option<&str>, workspace: &str) {
        self.annotations.insert(
            CREATOR_ANNOTATION.to_string(),
            creator.unwrap_or_default().to_string(),
        );
        self.annotations
            .insert(WORKSPACE_ANNOTATION.to_string(), workspace.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DevopsProject {
    /// Assigned by the resource store; absent until the project exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub creator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

impl DevopsProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The store-assigned id, treating an empty string the same as none.
    pub fn id(&self) -> Option<&str> {
        self.project_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChildKind {
    Namespace,
    DevopsProject,
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildKind::Namespace => write!(f, "namespace"),
            ChildKind::DevopsProject => write!(f, "devops-project"),
        }
    }
}

/// Reference to a child resource: a namespace name or a devops project id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChildRef {
    pub kind: ChildKind,
    pub id: String,
}

impl ChildRef {
    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            kind: ChildKind::Namespace,
            id: name.into(),
        }
    }

    pub fn devops_project(id: impl Into<String>) -> Self {
        Self {
            kind: ChildKind::DevopsProject,
            id: id.into(),
        }
    }
}

impl fmt::Display for ChildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Validate a namespace name as an RFC 1123 label.
pub fn validate_namespace_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 63 {
        return Err(OrchestratorError::InvalidInput(
            "Namespace name must be between 1 and 63 characters".to_string(),
        ));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(OrchestratorError::InvalidInput(
            "Namespace name cannot start or end with a hyphen".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(OrchestratorError::InvalidInput(format!(
            "Namespace name '{}' contains invalid characters (only lowercase alphanumeric and '-' allowed)",
            name
        )));
    }

    Ok(())
}

pub(crate) fn validate_devops_project(project: &DevopsProject) -> Result<()> {
    if project.name.trim().is_empty() {
        return Err(OrchestratorError::InvalidInput(
            "DevOps project name must not be empty".to_string(),
        ));
    }

    Ok(())
}
