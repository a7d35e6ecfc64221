use crate::error::{OrchestratorError, Result};
use crate::identity::{MemberView, UserInvite};
use crate::resource::ChildKind;
use crate::roles::{project_member, WorkspaceRoles};
use crate::store::IdentityStore;
use std::sync::Arc;
use tracing::{info, instrument};

/// Workspace membership queries and mutations.
#[derive(Clone)]
pub struct MembershipService {
    identity: Arc<dyn IdentityStore>,
    roles: WorkspaceRoles,
}

impl MembershipService {
    pub fn new(identity: Arc<dyn IdentityStore>, roles: WorkspaceRoles) -> Self {
        Self { identity, roles }
    }

    /// Every member of the workspace with their projected role view
    #[instrument(skip(self))]
    pub async fn list_members(&self, workspace: &str) -> Result<Vec<MemberView>> {
        let users = self.identity.workspace_members(workspace).await?;
        let namespaces = self
            .identity
            .bound_children(workspace, ChildKind::Namespace)
            .await?;

        Ok(users
            .into_iter()
            .map(|user| project_member(user, workspace, &namespaces))
            .collect())
    }

    /// One member, with namespace roles limited to the workspace's namespaces
    #[instrument(skip(self))]
    pub async fn get_member(&self, workspace: &str, username: &str) -> Result<MemberView> {
        let user = self.identity.get_user(username).await?;
        let namespaces = self
            .identity
            .bound_children(workspace, ChildKind::Namespace)
            .await?;

        Ok(project_member(user, workspace, &namespaces))
    }

    #[instrument(skip(self, invites), fields(count = invites.len()))]
    pub async fn invite(&self, workspace: &str, invites: &[UserInvite]) -> Result<()> {
        for invite in invites {
            if invite.username.is_empty() {
                return Err(OrchestratorError::InvalidInput(
                    "invite username must not be empty".to_string(),
                ));
            }
            if !self.roles.contains(&invite.role) {
                return Err(OrchestratorError::InvalidInput(format!(
                    "role {} is not a workspace role",
                    invite.role
                )));
            }
        }

        self.identity.invite(workspace, invites).await?;
        info!("members invited");

        Ok(())
    }

    /// Revoke membership; usernames without membership are not an error
    #[instrument(skip(self))]
    pub async fn remove_members(&self, workspace: &str, usernames: &[String]) -> Result<()> {
        if usernames.is_empty() {
            return Ok(());
        }

        self.identity.remove_members(workspace, usernames).await?;
        info!(count = usernames.len(), "members removed");

        Ok(())
    }
}
