//! In-memory store backends.
//!
//! Used by the service binary when no external backend is wired in, and by
//! tests. State lives in maps behind `tokio::sync::RwLock`; nothing is durable
//! and nothing is shared between processes.

use super::{IdentityStore, ResourceStore, StoreError, StoreResult};
use crate::identity::{PolicyRule, Role, User, UserInvite};
use crate::resource::{ChildKind, ChildRef, DevopsProject, Namespace};
use crate::roles::WorkspaceRoles;
use crate::workspace::Workspace;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryResourceStore {
    namespaces: RwLock<BTreeMap<String, Namespace>>,
    projects: RwLock<BTreeMap<String, DevopsProject>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace> {
        let mut namespaces = self.namespaces.write().await;
        if namespaces.contains_key(&namespace.name) {
            return Err(StoreError::Conflict(format!(
                "namespace {} already exists",
                namespace.name
            )));
        }
        namespaces.insert(namespace.name.clone(), namespace.clone());
        Ok(namespace)
    }

    async fn create_devops_project(
        &self,
        actor: Option<&str>,
        mut project: DevopsProject,
    ) -> StoreResult<DevopsProject> {
        let id = format!("project-{}", Uuid::new_v4().simple());
        project.project_id = Some(id.clone());
        project.creator = actor.unwrap_or_default().to_string();
        project.create_time = Some(Utc::now());

        self.projects.write().await.insert(id, project.clone());
        Ok(project)
    }

    async fn delete_child(&self, _actor: Option<&str>, child: &ChildRef) -> StoreResult<()> {
        let removed = match child.kind {
            ChildKind::Namespace => self.namespaces.write().await.remove(&child.id).is_some(),
            ChildKind::DevopsProject => self.projects.write().await.remove(&child.id).is_some(),
        };

        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(child.to_string()))
        }
    }

    async fn list_namespaces(&self, names: &[String]) -> StoreResult<Vec<Namespace>> {
        let namespaces = self.namespaces.read().await;
        Ok(names
            .iter()
            .filter_map(|name| namespaces.get(name).cloned())
            .collect())
    }

    async fn list_devops_projects(&self, ids: &[String]) -> StoreResult<Vec<DevopsProject>> {
        let projects = self.projects.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| projects.get(id).cloned())
            .collect())
    }
}

fn role_rules(role: &str) -> Vec<PolicyRule> {
    let verbs: &[&str] = if role.ends_with("admin") {
        &["*"]
    } else if role.ends_with("viewer") {
        &["get", "list", "watch"]
    } else {
        &["get", "list", "watch", "create", "update", "patch"]
    };

    vec![PolicyRule {
        verbs: verbs.iter().map(|v| v.to_string()).collect(),
        api_groups: vec!["*".to_string()],
        resources: vec!["*".to_string()],
    }]
}

pub struct InMemoryIdentityStore {
    roles: WorkspaceRoles,
    workspaces: RwLock<BTreeMap<String, Workspace>>,
    bindings: RwLock<BTreeMap<String, BTreeSet<ChildRef>>>,
    users: RwLock<BTreeMap<String, User>>,
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new(WorkspaceRoles::default())
    }
}

impl InMemoryIdentityStore {
    pub fn new(roles: WorkspaceRoles) -> Self {
        Self {
            roles,
            workspaces: RwLock::default(),
            bindings: RwLock::default(),
            users: RwLock::default(),
        }
    }

    /// Register a user; replaces any user with the same name.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.username.clone(), user);
    }

    fn role(&self, workspace: &str, name: &str) -> StoreResult<Role> {
        if !self.roles.contains(name) {
            return Err(StoreError::NotFound(format!("role {}", name)));
        }

        Ok(Role {
            name: name.to_string(),
            workspace: workspace.to_string(),
            description: None,
            rules: role_rules(name),
        })
    }

    async fn ensure_workspace(&self, name: &str) -> StoreResult<()> {
        if self.workspaces.read().await.contains_key(name) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("workspace {}", name)))
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create_workspace(&self, workspace: Workspace) -> StoreResult<Workspace> {
        let mut workspaces = self.workspaces.write().await;
        if workspaces.contains_key(&workspace.name) {
            return Err(StoreError::Conflict(format!(
                "workspace {} already exists",
                workspace.name
            )));
        }
        workspaces.insert(workspace.name.clone(), workspace.clone());
        Ok(workspace)
    }

    async fn update_workspace(&self, mut workspace: Workspace) -> StoreResult<Workspace> {
        let mut workspaces = self.workspaces.write().await;
        let existing = workspaces
            .get_mut(&workspace.name)
            .ok_or_else(|| StoreError::NotFound(format!("workspace {}", workspace.name)))?;

        workspace.creator = existing.creator.clone();
        workspace.created_at = existing.created_at;
        *existing = workspace.clone();
        Ok(workspace)
    }

    /// Removes the workspace together with its associations and grants.
    /// Child resources themselves stay in the resource store.
    async fn delete_workspace(&self, name: &str) -> StoreResult<()> {
        let mut workspaces = self.workspaces.write().await;
        if workspaces.remove(name).is_none() {
            return Err(StoreError::NotFound(format!("workspace {}", name)));
        }

        self.bindings.write().await.remove(name);
        for user in self.users.write().await.values_mut() {
            user.workspace_roles.remove(name);
            user.workspace_rules.remove(name);
        }
        Ok(())
    }

    async fn get_workspace(&self, name: &str) -> StoreResult<Workspace> {
        self.workspaces
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("workspace {}", name)))
    }

    async fn list_workspaces(&self, names: &[String]) -> StoreResult<Vec<Workspace>> {
        let workspaces = self.workspaces.read().await;
        Ok(workspaces
            .values()
            .filter(|ws| names.is_empty() || names.contains(&ws.name))
            .cloned()
            .collect())
    }

    async fn bind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()> {
        self.ensure_workspace(workspace).await?;

        let mut bindings = self.bindings.write().await;
        if let Some((owner, _)) = bindings
            .iter()
            .find(|(owner, children)| owner.as_str() != workspace && children.contains(child))
        {
            return Err(StoreError::Conflict(format!(
                "{} is already bound to workspace {}",
                child, owner
            )));
        }

        bindings
            .entry(workspace.to_string())
            .or_default()
            .insert(child.clone());
        Ok(())
    }

    async fn unbind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()> {
        self.ensure_workspace(workspace).await?;

        let removed = self
            .bindings
            .write()
            .await
            .get_mut(workspace)
            .is_some_and(|children| children.remove(child));

        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!(
                "{} in workspace {}",
                child, workspace
            )))
        }
    }

    async fn bound_children(&self, workspace: &str, kind: ChildKind) -> StoreResult<Vec<String>> {
        self.ensure_workspace(workspace).await?;

        Ok(self
            .bindings
            .read()
            .await
            .get(workspace)
            .map(|children| {
                children
                    .iter()
                    .filter(|child| child.kind == kind)
                    .map(|child| child.id.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_user(&self, username: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {}", username)))
    }

    async fn workspace_members(&self, workspace: &str) -> StoreResult<Vec<User>> {
        self.ensure_workspace(workspace).await?;

        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.workspace_roles.contains_key(workspace))
            .cloned()
            .collect())
    }

    async fn workspace_role_rules(
        &self,
        workspace: &str,
        role: &str,
    ) -> StoreResult<(Role, Vec<PolicyRule>)> {
        self.ensure_workspace(workspace).await?;

        let role = self.role(workspace, role)?;
        let rules = role.rules.clone();
        Ok((role, rules))
    }

    async fn workspace_role_users(&self, workspace: &str, role: &str) -> StoreResult<Vec<User>> {
        self.ensure_workspace(workspace).await?;

        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.workspace_roles.get(workspace).map(String::as_str) == Some(role))
            .cloned()
            .collect())
    }

    async fn workspace_roles(&self, workspace: &Workspace) -> StoreResult<Vec<Role>> {
        self.roles
            .iter()
            .map(|name| self.role(&workspace.name, name))
            .collect()
    }

    async fn invite(&self, workspace: &str, invites: &[UserInvite]) -> StoreResult<()> {
        self.ensure_workspace(workspace).await?;

        let mut users = self.users.write().await;
        let mut granted = Vec::with_capacity(invites.len());
        for invite in invites {
            if !users.contains_key(&invite.username) {
                return Err(StoreError::NotFound(format!("user {}", invite.username)));
            }
            granted.push((invite.username.as_str(), self.role(workspace, &invite.role)?));
        }

        for (username, role) in granted {
            if let Some(user) = users.get_mut(username) {
                user.workspace_roles
                    .insert(workspace.to_string(), role.name.clone());
                user.workspace_rules.insert(workspace.to_string(), role.rules);
            }
        }
        Ok(())
    }

    async fn remove_members(&self, workspace: &str, usernames: &[String]) -> StoreResult<()> {
        self.ensure_workspace(workspace).await?;

        let mut users = self.users.write().await;
        for username in usernames {
            if let Some(user) = users.get_mut(username) {
                user.workspace_roles.remove(workspace);
                user.workspace_rules.remove(workspace);
            }
        }
        Ok(())
    }
}
