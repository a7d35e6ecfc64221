//! Workspace role enumeration and role projection.

use crate::error::{OrchestratorError, Result};
use crate::identity::{MemberView, Role, RoleDetail, User};
use crate::store::IdentityStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

pub const DEFAULT_WORKSPACE_ROLES: [&str; 3] =
    ["workspace-admin", "workspace-regular", "workspace-viewer"];

/// The closed set of role names a workspace grant may use.
///
/// Built once from configuration and shared read-only between services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoles(Arc<[String]>);

impl WorkspaceRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unknown role names are reported as missing, not as bad input.
    pub fn ensure_known(&self, role: &str) -> Result<()> {
        if self.contains(role) {
            Ok(())
        } else {
            Err(OrchestratorError::NotFound(format!("role {}", role)))
        }
    }
}

impl Default for WorkspaceRoles {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_ROLES)
    }
}

/// Project a user's grants onto one workspace.
///
/// Keeps the workspace role for `workspace` and the namespace roles for
/// namespaces in `namespaces`; every rule body is dropped.
pub fn project_member(user: User, workspace: &str, namespaces: &[String]) -> MemberView {
    let workspace_role = user.workspace_roles.get(workspace).cloned();

    let roles: BTreeMap<String, String> = namespaces
        .iter()
        .filter_map(|ns| match user.roles.get(ns) {
            Some(role) if !role.is_empty() => Some((ns.clone(), role.clone())),
            _ => None,
        })
        .collect();

    MemberView {
        username: user.username,
        email: user.email,
        workspace_role,
        roles,
    }
}

#[derive(Clone)]
pub struct RoleProjector {
    identity: Arc<dyn IdentityStore>,
    roles: WorkspaceRoles,
}

impl RoleProjector {
    pub fn new(identity: Arc<dyn IdentityStore>, roles: WorkspaceRoles) -> Self {
        Self { identity, roles }
    }

    /// A role's rules together with the users holding it in `workspace`
    #[instrument(skip(self))]
    pub async fn role_detail(&self, workspace: &str, role: &str) -> Result<RoleDetail> {
        self.roles.ensure_known(role)?;

        let (role, rules) = self.identity.workspace_role_rules(workspace, role).await?;
        let users = self
            .identity
            .workspace_role_users(workspace, &role.name)
            .await?
            .into_iter()
            .map(|user| user.username)
            .collect();

        Ok(RoleDetail { role, rules, users })
    }

    /// All roles visible in a workspace; the workspace must exist
    #[instrument(skip(self))]
    pub async fn list_roles(&self, workspace: &str) -> Result<Vec<Role>> {
        let workspace = self.identity.get_workspace(workspace).await?;

        Ok(self.identity.workspace_roles(&workspace).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PolicyRule;

    fn rule(verb: &str) -> PolicyRule {
        PolicyRule {
            verbs: vec![verb.to_string()],
            api_groups: vec!["*".to_string()],
            resources: vec!["*".to_string()],
        }
    }

    #[test]
    fn test_workspace_roles_membership() {
        let roles = WorkspaceRoles::default();

        assert_eq!(roles.len(), 3);
        assert!(roles.contains("workspace-admin"));
        assert!(!roles.contains("cluster-admin"));
        assert!(roles.ensure_known("workspace-viewer").is_ok());
    }

    #[test]
    fn test_unknown_role_is_not_found() {
        let roles = WorkspaceRoles::new(["owner"]);
        let err = roles.ensure_known("intruder").unwrap_err();

        assert!(matches!(err, OrchestratorError::NotFound(_)));
        assert_eq!(err.to_string(), "role intruder not found");
    }

    #[test]
    fn test_project_member_filters_namespaces_and_strips_rules() {
        let mut user = User::new("alice");
        user.email = Some("alice@example.com".to_string());
        user.cluster_rules = vec![rule("get")];
        user.workspace_roles
            .insert("demo".to_string(), "workspace-admin".to_string());
        user.workspace_roles
            .insert("other".to_string(), "workspace-viewer".to_string());
        user.workspace_rules.insert("demo".to_string(), vec![rule("*")]);
        for ns in ["a", "b", "c"] {
            user.roles.insert(ns.to_string(), "admin".to_string());
            user.rules.insert(ns.to_string(), vec![rule("list")]);
        }

        let view = project_member(user, "demo", &["a".to_string(), "b".to_string()]);

        assert_eq!(view.username, "alice");
        assert_eq!(view.email.as_deref(), Some("alice@example.com"));
        assert_eq!(view.workspace_role.as_deref(), Some("workspace-admin"));
        assert_eq!(view.roles.keys().collect::<Vec<_>>(), vec!["a", "b"]);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("cluster_rules").is_none());
        assert!(json.get("workspace_rules").is_none());
        assert!(json.get("rules").is_none());
    }

    #[test]
    fn test_project_member_without_workspace_role() {
        let mut user = User::new("bob");
        user.roles.insert("a".to_string(), String::new());

        let view = project_member(user, "demo", &["a".to_string()]);

        assert_eq!(view.workspace_role, None);
        assert!(view.roles.is_empty());
    }
}
