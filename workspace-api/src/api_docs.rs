use crate::routes::MessageResponse;
use utoipa::OpenApi;
use workspace_orchestrator::{
    DevopsProject, MemberView, Namespace, PolicyRule, Role, RoleDetail, UserInvite, Workspace,
};

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            Workspace,
            Namespace,
            DevopsProject,
            MemberView,
            Role,
            RoleDetail,
            PolicyRule,
            UserInvite,
            MessageResponse
        )
    ),
    tags(
        (name = "workspace-api", description = "Workspace Orchestration API")
    )
)]
pub struct ApiDoc;
