use serde::Deserialize;
use workspace_orchestrator::roles::DEFAULT_WORKSPACE_ROLES;
use workspace_orchestrator::WorkspaceRoles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_workspace_roles")]
    pub workspace_roles: Vec<String>,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Users registered in the in-memory identity store at startup.
    #[serde(default = "default_seed_users")]
    pub seed_users: Vec<String>,
}

fn default_bind_addr() -> String {
    std::env::var("WORKSPACE_API_BIND").unwrap_or_else(|_| "0.0.0.0:9090".to_string())
}

fn default_workspace_roles() -> Vec<String> {
    std::env::var("WORKSPACE_API_ROLES")
        .ok()
        .map(|s| parse_list(&s))
        .filter(|roles| !roles.is_empty())
        .unwrap_or_else(|| DEFAULT_WORKSPACE_ROLES.iter().map(|r| r.to_string()).collect())
}

fn default_log_format() -> LogFormat {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Human,
    }
}

fn default_seed_users() -> Vec<String> {
    std::env::var("WORKSPACE_API_SEED_USERS")
        .map(|s| parse_list(&s))
        .unwrap_or_default()
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            workspace_roles: default_workspace_roles(),
            log_format: default_log_format(),
            seed_users: default_seed_users(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// The role enumeration handed to the orchestrator
    pub fn roles(&self) -> WorkspaceRoles {
        WorkspaceRoles::new(self.workspace_roles.iter().cloned())
    }
}
