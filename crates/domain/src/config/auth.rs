use serde::{Deserialize, Serialize};

/// Credentials and connection settings for the identity service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub user_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub project_domain_id: Option<String>,

    /// Pre-issued token; skips password authentication when set.
    pub token: Option<String>,

    pub region_name: Option<String>,

    /// Interface of the identity endpoint to talk to once authenticated.
    pub endpoint_type: String,

    pub insecure: bool,

    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            username: None,
            user_id: None,
            password: None,
            user_domain_name: None,
            user_domain_id: None,
            project_name: None,
            project_id: None,
            project_domain_name: None,
            project_domain_id: None,
            token: None,
            region_name: None,
            endpoint_type: default_endpoint_type(),
            insecure: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AuthConfig {
    pub fn uses_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn default_endpoint_type() -> String {
    "public".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
