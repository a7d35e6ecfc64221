use crate::binding::BindingCoordinator;
use crate::membership::MembershipService;
use crate::roles::{RoleProjector, WorkspaceRoles};
use crate::store::memory::{InMemoryIdentityStore, InMemoryResourceStore};
use crate::store::{IdentityStore, ResourceStore};
use crate::workspace::WorkspaceLifecycle;
use std::sync::Arc;

/// The four workspace services wired to one pair of stores.
#[derive(Clone)]
pub struct WorkspaceOrchestrator {
    workspaces: WorkspaceLifecycle,
    bindings: BindingCoordinator,
    members: MembershipService,
    roles: RoleProjector,
}

impl WorkspaceOrchestrator {
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        identity: Arc<dyn IdentityStore>,
        roles: WorkspaceRoles,
    ) -> Self {
        Self {
            workspaces: WorkspaceLifecycle::new(identity.clone()),
            bindings: BindingCoordinator::new(resources, identity.clone()),
            members: MembershipService::new(identity.clone(), roles.clone()),
            roles: RoleProjector::new(identity, roles),
        }
    }

    /// Orchestrator backed by fresh in-memory stores
    pub fn in_memory(roles: WorkspaceRoles) -> Self {
        Self::new(
            Arc::new(InMemoryResourceStore::new()),
            Arc::new(InMemoryIdentityStore::new(roles.clone())),
            roles,
        )
    }

    pub fn workspaces(&self) -> &WorkspaceLifecycle {
        &self.workspaces
    }

    pub fn bindings(&self) -> &BindingCoordinator {
        &self.bindings
    }

    pub fn members(&self) -> &MembershipService {
        &self.members
    }

    pub fn roles(&self) -> &RoleProjector {
        &self.roles
    }
}
