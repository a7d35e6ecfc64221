use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use workspace_api::{create_app, Config, LogFormat};
use workspace_orchestrator::store::memory::{InMemoryIdentityStore, InMemoryResourceStore};
use workspace_orchestrator::{User, WorkspaceOrchestrator};

const DEFAULT_LOG_FILTER: &str = "workspace_api=debug,workspace_orchestrator=debug,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
        LogFormat::Human => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();

    init_tracing(config.log_format);
    info!("Starting workspace-api service...");
    info!(
        "Configuration loaded: bind_addr={}, workspace_roles={:?}",
        config.bind_addr, config.workspace_roles
    );

    // Stores are in-memory until an external backend is wired in
    let roles = config.roles();
    let identity = InMemoryIdentityStore::new(roles.clone());
    for username in &config.seed_users {
        identity.insert_user(User::new(username.clone())).await;
    }
    info!("Seeded {} users", config.seed_users.len());

    let orchestrator = WorkspaceOrchestrator::new(
        Arc::new(InMemoryResourceStore::new()),
        Arc::new(identity),
        roles,
    );

    let app = create_app(orchestrator);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
