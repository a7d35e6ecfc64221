//! Users, roles and the views projected from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A single access rule, shaped like a Kubernetes `PolicyRule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PolicyRule {
    #[serde(default)]
    pub verbs: Vec<String>,

    #[serde(default)]
    pub api_groups: Vec<String>,

    #[serde(default)]
    pub resources: Vec<String>,
}

/// A user as recorded by the identity store, with every grant set it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub cluster_rules: Vec<PolicyRule>,

    /// Workspace name to role name.
    #[serde(default)]
    pub workspace_roles: BTreeMap<String, String>,

    /// Workspace name to the rules that role grants.
    #[serde(default)]
    pub workspace_rules: BTreeMap<String, Vec<PolicyRule>>,

    /// Namespace name to role name.
    #[serde(default)]
    pub roles: BTreeMap<String, String>,

    /// Namespace name to the rules that role grants.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<PolicyRule>>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }
}

/// A workspace-scoped role template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub name: String,
    pub workspace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInvite {
    pub username: String,
    pub role: String,
}

/// A member as seen from one workspace: role names only, no rule bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberView {
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_role: Option<String>,

    /// Namespace name to role name, restricted to the workspace's namespaces.
    #[serde(default)]
    pub roles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleDetail {
    pub role: Role,
    pub rules: Vec<PolicyRule>,
    pub users: Vec<String>,
}
