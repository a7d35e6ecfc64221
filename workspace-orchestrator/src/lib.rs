//! Workspace orchestration business logic
//!
//! A workspace groups namespaces, devops projects, members and roles under one
//! tenant boundary. This crate binds child resources to workspaces with
//! best-effort compensation and projects membership and role grants. It is
//! consumed by the workspace-api HTTP service but holds no state of its own;
//! every operation reads or mutates the external stores behind the traits in
//! [`store`].

pub mod binding;
pub mod error;
pub mod identity;
pub mod membership;
pub mod orchestrator;
pub mod resource;
pub mod roles;
pub mod store;
pub mod workspace;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use binding::{BindingCoordinator, BindingPhase};
pub use error::{ErrorKind, OrchestratorError, Result};
pub use identity::{MemberView, PolicyRule, Role, RoleDetail, User, UserInvite};
pub use membership::MembershipService;
pub use orchestrator::WorkspaceOrchestrator;
pub use resource::{ChildKind, ChildRef, DevopsProject, Namespace};
pub use roles::{RoleProjector, WorkspaceRoles};
pub use store::{IdentityStore, ResourceStore, StoreError, StoreResult};
pub use workspace::{Workspace, WorkspaceLifecycle};
