//! Creating and deleting child resources together with their workspace binding.
//!
//! The resource store and the identity store share no transaction, so each
//! operation is a two-step sequence driven by a [`BindingCommand`]:
//!
//! - bind-create: create the child, then bind it. A failed bind is compensated
//!   by deleting the child again ([`rollback_created_child`]), and the bind
//!   error is what the caller sees.
//! - unbind-delete: unbind the child, then delete it. A failed unbind stops
//!   the sequence unless the caller forces it, in which case the child is
//!   deleted anyway and the delete result is reported.
//!
//! There is exactly one compensating action and no retries.

use crate::error::{OrchestratorError, Result};
use crate::resource::{
    validate_devops_project, validate_namespace_name, ChildKind, ChildRef, DevopsProject,
    Namespace,
};
use crate::store::{IdentityStore, ResourceStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const PROJECT_CREATE_FAILED: &str = "project create failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingPhase {
    NotStarted,
    ChildMutated,
    AssociationMutated,
    Compensated,
    Done,
}

/// Store conflicts while creating or binding a child surface as internal
/// failures, like any other store error in that sequence.
fn create_failure(err: StoreError) -> OrchestratorError {
    match err {
        StoreError::Conflict(message) => OrchestratorError::Internal(message),
        other => other.into(),
    }
}

/// Delete a child whose bind just failed.
///
/// Best effort: a failed delete is logged on the `compensation` target and
/// otherwise swallowed, so the bind error stays the reported one.
pub async fn rollback_created_child(
    resources: &dyn ResourceStore,
    actor: Option<&str>,
    workspace: &str,
    child: &ChildRef,
) {
    match resources.delete_child(actor, child).await {
        Ok(()) => {
            debug!(workspace, kind = %child.kind, child = %child.id, "rolled back child resource");
        }
        Err(err) => {
            warn!(
                target: "workspace_orchestrator::compensation",
                workspace,
                kind = %child.kind,
                child = %child.id,
                error = %err,
                "failed to roll back child resource after bind failure"
            );
        }
    }
}

/// One create/bind or unbind/delete sequence against the two stores.
pub struct BindingCommand<'a> {
    resources: &'a dyn ResourceStore,
    identity: &'a dyn IdentityStore,
    workspace: &'a str,
    actor: Option<&'a str>,
    phase: BindingPhase,
}

impl<'a> BindingCommand<'a> {
    pub fn new(
        resources: &'a dyn ResourceStore,
        identity: &'a dyn IdentityStore,
        workspace: &'a str,
        actor: Option<&'a str>,
    ) -> Self {
        Self {
            resources,
            identity,
            workspace,
            actor,
            phase: BindingPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> BindingPhase {
        self.phase
    }

    fn advance(&mut self, next: BindingPhase) {
        debug!(workspace = self.workspace, from = ?self.phase, to = ?next, "binding phase");
        self.phase = next;
    }

    /// Bind a child that was just created, deleting it again if the bind fails.
    pub async fn bind_created(&mut self, child: &ChildRef) -> Result<()> {
        self.advance(BindingPhase::ChildMutated);

        if let Err(err) = self.identity.bind(self.workspace, child).await {
            rollback_created_child(self.resources, self.actor, self.workspace, child).await;
            self.advance(BindingPhase::Compensated);
            return Err(create_failure(err));
        }

        self.advance(BindingPhase::AssociationMutated);
        self.advance(BindingPhase::Done);
        Ok(())
    }

    /// Unbind a child, then delete it.
    ///
    /// With `force`, an unbind failure is logged and the delete still runs.
    pub async fn unbind_then_delete(&mut self, child: &ChildRef, force: bool) -> Result<()> {
        match self.identity.unbind(self.workspace, child).await {
            Ok(()) => self.advance(BindingPhase::AssociationMutated),
            Err(err) if force => {
                warn!(
                    workspace = self.workspace,
                    kind = %child.kind,
                    child = %child.id,
                    error = %err,
                    "unbind failed, deleting anyway (forced)"
                );
            }
            Err(err) => return Err(err.into()),
        }

        self.resources.delete_child(self.actor, child).await?;
        self.advance(BindingPhase::ChildMutated);
        self.advance(BindingPhase::Done);
        Ok(())
    }
}

/// Compensating create/bind and unbind/delete for namespaces and devops projects.
#[derive(Clone)]
pub struct BindingCoordinator {
    resources: Arc<dyn ResourceStore>,
    identity: Arc<dyn IdentityStore>,
}

impl BindingCoordinator {
    pub fn new(resources: Arc<dyn ResourceStore>, identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            resources,
            identity,
        }
    }

    fn command<'a>(&'a self, workspace: &'a str, actor: Option<&'a str>) -> BindingCommand<'a> {
        BindingCommand::new(&*self.resources, &*self.identity, workspace, actor)
    }

    /// Create a namespace annotated for `workspace` and bind it
    #[instrument(skip(self, namespace), fields(namespace = %namespace.name))]
    pub async fn create_namespace(
        &self,
        workspace: &str,
        actor: Option<&str>,
        mut namespace: Namespace,
    ) -> Result<Namespace> {
        validate_namespace_name(&namespace.name)?;
        namespace.annotate(actor, workspace);

        let created = self
            .resources
            .create_namespace(namespace)
            .await
            .map_err(create_failure)?;

        self.command(workspace, actor)
            .bind_created(&ChildRef::namespace(&created.name))
            .await?;
        info!("namespace created and bound");

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_namespace(&self, workspace: &str, namespace: &str, force: bool) -> Result<()> {
        self.command(workspace, None)
            .unbind_then_delete(&ChildRef::namespace(namespace), force)
            .await?;
        info!("namespace unbound and deleted");

        Ok(())
    }

    /// Create a devops project for `actor` and bind it
    #[instrument(skip(self, project), fields(project = %project.name))]
    pub async fn create_devops_project(
        &self,
        workspace: &str,
        actor: Option<&str>,
        mut project: DevopsProject,
    ) -> Result<DevopsProject> {
        validate_devops_project(&project)?;
        project.project_id = None;
        project.creator = actor.unwrap_or_default().to_string();

        let created = self
            .resources
            .create_devops_project(actor, project)
            .await
            .map_err(create_failure)?;

        let Some(id) = created.id() else {
            warn!("resource store returned no project id, skipping bind");
            return Err(OrchestratorError::Internal(
                PROJECT_CREATE_FAILED.to_string(),
            ));
        };

        self.command(workspace, actor)
            .bind_created(&ChildRef::devops_project(id))
            .await?;
        info!(project_id = id, "devops project created and bound");

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_devops_project(
        &self,
        workspace: &str,
        actor: Option<&str>,
        project_id: &str,
        force: bool,
    ) -> Result<()> {
        self.command(workspace, actor)
            .unbind_then_delete(&ChildRef::devops_project(project_id), force)
            .await?;
        info!("devops project unbound and deleted");

        Ok(())
    }

    /// Namespaces currently bound to the workspace
    pub async fn list_namespaces(&self, workspace: &str) -> Result<Vec<Namespace>> {
        let names = self
            .identity
            .bound_children(workspace, ChildKind::Namespace)
            .await?;

        Ok(self.resources.list_namespaces(&names).await?)
    }

    /// Devops projects currently bound to the workspace
    pub async fn list_devops_projects(&self, workspace: &str) -> Result<Vec<DevopsProject>> {
        let ids = self
            .identity
            .bound_children(workspace, ChildKind::DevopsProject)
            .await?;

        Ok(self.resources.list_devops_projects(&ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FaultyIdentityStore, FaultyResourceStore, Op};
    use crate::workspace::Workspace;

    async fn stores() -> (FaultyResourceStore, FaultyIdentityStore) {
        let resources = FaultyResourceStore::default();
        let identity = FaultyIdentityStore::default();
        identity
            .inner()
            .create_workspace(Workspace::new("demo"))
            .await
            .unwrap();
        (resources, identity)
    }

    #[tokio::test]
    async fn test_bind_created_reaches_done() {
        let (resources, identity) = stores().await;
        resources
            .inner()
            .create_namespace(Namespace::new("dev"))
            .await
            .unwrap();

        let mut cmd = BindingCommand::new(&resources, &identity, "demo", Some("alice"));
        cmd.bind_created(&ChildRef::namespace("dev")).await.unwrap();

        assert_eq!(cmd.phase(), BindingPhase::Done);
        assert_eq!(resources.calls(Op::DeleteChild), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_compensates() {
        let (resources, identity) = stores().await;
        identity.fail(Op::Bind);
        resources
            .inner()
            .create_namespace(Namespace::new("dev"))
            .await
            .unwrap();

        let mut cmd = BindingCommand::new(&resources, &identity, "demo", None);
        let err = cmd
            .bind_created(&ChildRef::namespace("dev"))
            .await
            .unwrap_err();

        assert_eq!(cmd.phase(), BindingPhase::Compensated);
        assert!(err.to_string().contains("bind"));
        assert_eq!(resources.calls(Op::DeleteChild), 1);
        assert!(resources
            .inner()
            .list_namespaces(&["dev".to_string()])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rollback_failure_is_swallowed() {
        let (resources, identity) = stores().await;
        identity.fail(Op::Bind);
        resources.fail(Op::DeleteChild);

        let mut cmd = BindingCommand::new(&resources, &identity, "demo", None);
        let err = cmd
            .bind_created(&ChildRef::namespace("dev"))
            .await
            .unwrap_err();

        // the reported error is the bind error, not the delete error
        assert!(err.to_string().contains("bind"));
        assert!(!err.to_string().contains("delete_child"));
        assert_eq!(cmd.phase(), BindingPhase::Compensated);
    }

    #[tokio::test]
    async fn test_unbind_failure_without_force_keeps_child() {
        let (resources, identity) = stores().await;
        identity.fail(Op::Unbind);

        let mut cmd = BindingCommand::new(&resources, &identity, "demo", None);
        let err = cmd
            .unbind_then_delete(&ChildRef::namespace("dev"), false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("unbind"));
        assert_eq!(cmd.phase(), BindingPhase::NotStarted);
        assert_eq!(resources.calls(Op::DeleteChild), 0);
    }

    #[tokio::test]
    async fn test_forced_delete_runs_after_unbind_failure() {
        let (resources, identity) = stores().await;
        identity.fail(Op::Unbind);
        resources
            .inner()
            .create_namespace(Namespace::new("dev"))
            .await
            .unwrap();

        let mut cmd = BindingCommand::new(&resources, &identity, "demo", None);
        cmd.unbind_then_delete(&ChildRef::namespace("dev"), true)
            .await
            .unwrap();

        assert_eq!(cmd.phase(), BindingPhase::Done);
        assert_eq!(resources.calls(Op::DeleteChild), 1);
    }
}
