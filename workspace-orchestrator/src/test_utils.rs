//! Store wrappers for tests: fail chosen operations and count every call.

use crate::identity::{PolicyRule, Role, User, UserInvite};
use crate::resource::{ChildKind, ChildRef, DevopsProject, Namespace};
use crate::store::memory::{InMemoryIdentityStore, InMemoryResourceStore};
use crate::store::{IdentityStore, ResourceStore, StoreError, StoreResult};
use crate::workspace::Workspace;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CreateNamespace,
    CreateDevopsProject,
    DeleteChild,
    ListNamespaces,
    ListDevopsProjects,
    CreateWorkspace,
    UpdateWorkspace,
    DeleteWorkspace,
    GetWorkspace,
    ListWorkspaces,
    Bind,
    Unbind,
    BoundChildren,
    GetUser,
    WorkspaceMembers,
    WorkspaceRoleRules,
    WorkspaceRoleUsers,
    WorkspaceRoles,
    Invite,
    RemoveMembers,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::CreateNamespace => "create_namespace",
            Op::CreateDevopsProject => "create_devops_project",
            Op::DeleteChild => "delete_child",
            Op::ListNamespaces => "list_namespaces",
            Op::ListDevopsProjects => "list_devops_projects",
            Op::CreateWorkspace => "create_workspace",
            Op::UpdateWorkspace => "update_workspace",
            Op::DeleteWorkspace => "delete_workspace",
            Op::GetWorkspace => "get_workspace",
            Op::ListWorkspaces => "list_workspaces",
            Op::Bind => "bind",
            Op::Unbind => "unbind",
            Op::BoundChildren => "bound_children",
            Op::GetUser => "get_user",
            Op::WorkspaceMembers => "workspace_members",
            Op::WorkspaceRoleRules => "workspace_role_rules",
            Op::WorkspaceRoleUsers => "workspace_role_users",
            Op::WorkspaceRoles => "workspace_roles",
            Op::Invite => "invite",
            Op::RemoveMembers => "remove_members",
        };
        f.write_str(name)
    }
}

#[derive(Default)]
struct Faults {
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<HashMap<Op, usize>>,
}

impl Faults {
    fn check(&self, op: Op) -> StoreResult<()> {
        *self
            .calls
            .lock()
            .expect("fault call counter poisoned")
            .entry(op)
            .or_default() += 1;

        if self
            .failing
            .lock()
            .expect("fault set poisoned")
            .contains(&op)
        {
            return Err(StoreError::Unexpected(anyhow::anyhow!(
                "injected failure: {}",
                op
            )));
        }
        Ok(())
    }

    fn fail(&self, op: Op) {
        self.failing.lock().expect("fault set poisoned").insert(op);
    }

    fn heal(&self, op: Op) {
        self.failing.lock().expect("fault set poisoned").remove(&op);
    }

    fn calls(&self, op: Op) -> usize {
        self.calls
            .lock()
            .expect("fault call counter poisoned")
            .get(&op)
            .copied()
            .unwrap_or_default()
    }
}

/// [`InMemoryResourceStore`] with injectable failures.
#[derive(Default)]
pub struct FaultyResourceStore {
    inner: InMemoryResourceStore,
    faults: Faults,
    /// Return created devops projects without an id.
    drop_project_ids: AtomicBool,
}

impl FaultyResourceStore {
    pub fn inner(&self) -> &InMemoryResourceStore {
        &self.inner
    }

    pub fn fail(&self, op: Op) {
        self.faults.fail(op);
    }

    pub fn heal(&self, op: Op) {
        self.faults.heal(op);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.faults.calls(op)
    }

    pub fn drop_project_ids(&self) {
        self.drop_project_ids.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceStore for FaultyResourceStore {
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace> {
        self.faults.check(Op::CreateNamespace)?;
        self.inner.create_namespace(namespace).await
    }

    async fn create_devops_project(
        &self,
        actor: Option<&str>,
        project: DevopsProject,
    ) -> StoreResult<DevopsProject> {
        self.faults.check(Op::CreateDevopsProject)?;
        let mut created = self.inner.create_devops_project(actor, project).await?;
        if self.drop_project_ids.load(Ordering::SeqCst) {
            created.project_id = None;
        }
        Ok(created)
    }

    async fn delete_child(&self, actor: Option<&str>, child: &ChildRef) -> StoreResult<()> {
        self.faults.check(Op::DeleteChild)?;
        self.inner.delete_child(actor, child).await
    }

    async fn list_namespaces(&self, names: &[String]) -> StoreResult<Vec<Namespace>> {
        self.faults.check(Op::ListNamespaces)?;
        self.inner.list_namespaces(names).await
    }

    async fn list_devops_projects(&self, ids: &[String]) -> StoreResult<Vec<DevopsProject>> {
        self.faults.check(Op::ListDevopsProjects)?;
        self.inner.list_devops_projects(ids).await
    }
}

/// [`InMemoryIdentityStore`] with injectable failures.
#[derive(Default)]
pub struct FaultyIdentityStore {
    inner: InMemoryIdentityStore,
    faults: Faults,
}

impl FaultyIdentityStore {
    pub fn new(inner: InMemoryIdentityStore) -> Self {
        Self {
            inner,
            faults: Faults::default(),
        }
    }

    pub fn inner(&self) -> &InMemoryIdentityStore {
        &self.inner
    }

    pub fn fail(&self, op: Op) {
        self.faults.fail(op);
    }

    pub fn heal(&self, op: Op) {
        self.faults.heal(op);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.faults.calls(op)
    }

    /// Total calls across every identity operation.
    pub fn total_calls(&self) -> usize {
        self.faults
            .calls
            .lock()
            .expect("fault call counter poisoned")
            .values()
            .sum()
    }
}

#[async_trait]
impl IdentityStore for FaultyIdentityStore {
    async fn create_workspace(&self, workspace: Workspace) -> StoreResult<Workspace> {
        self.faults.check(Op::CreateWorkspace)?;
        self.inner.create_workspace(workspace).await
    }

    async fn update_workspace(&self, workspace: Workspace) -> StoreResult<Workspace> {
        self.faults.check(Op::UpdateWorkspace)?;
        self.inner.update_workspace(workspace).await
    }

    async fn delete_workspace(&self, name: &str) -> StoreResult<()> {
        self.faults.check(Op::DeleteWorkspace)?;
        self.inner.delete_workspace(name).await
    }

    async fn get_workspace(&self, name: &str) -> StoreResult<Workspace> {
        self.faults.check(Op::GetWorkspace)?;
        self.inner.get_workspace(name).await
    }

    async fn list_workspaces(&self, names: &[String]) -> StoreResult<Vec<Workspace>> {
        self.faults.check(Op::ListWorkspaces)?;
        self.inner.list_workspaces(names).await
    }

    async fn bind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()> {
        self.faults.check(Op::Bind)?;
        self.inner.bind(workspace, child).await
    }

    async fn unbind(&self, workspace: &str, child: &ChildRef) -> StoreResult<()> {
        self.faults.check(Op::Unbind)?;
        self.inner.unbind(workspace, child).await
    }

    async fn bound_children(&self, workspace: &str, kind: ChildKind) -> StoreResult<Vec<String>> {
        self.faults.check(Op::BoundChildren)?;
        self.inner.bound_children(workspace, kind).await
    }

    async fn get_user(&self, username: &str) -> StoreResult<User> {
        self.faults.check(Op::GetUser)?;
        self.inner.get_user(username).await
    }

    async fn workspace_members(&self, workspace: &str) -> StoreResult<Vec<User>> {
        self.faults.check(Op::WorkspaceMembers)?;
        self.inner.workspace_members(workspace).await
    }

    async fn workspace_role_rules(
        &self,
        workspace: &str,
        role: &str,
    ) -> StoreResult<(Role, Vec<PolicyRule>)> {
        self.faults.check(Op::WorkspaceRoleRules)?;
        self.inner.workspace_role_rules(workspace, role).await
    }

    async fn workspace_role_users(&self, workspace: &str, role: &str) -> StoreResult<Vec<User>> {
        self.faults.check(Op::WorkspaceRoleUsers)?;
        self.inner.workspace_role_users(workspace, role).await
    }

    async fn workspace_roles(&self, workspace: &Workspace) -> StoreResult<Vec<Role>> {
        self.faults.check(Op::WorkspaceRoles)?;
        self.inner.workspace_roles(workspace).await
    }

    async fn invite(&self, workspace: &str, invites: &[UserInvite]) -> StoreResult<()> {
        self.faults.check(Op::Invite)?;
        self.inner.invite(workspace, invites).await
    }

    async fn remove_members(&self, workspace: &str, usernames: &[String]) -> StoreResult<()> {
        self.faults.check(Op::RemoveMembers)?;
        self.inner.remove_members(workspace, usernames).await
    }
}
