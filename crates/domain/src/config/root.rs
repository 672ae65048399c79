use serde::{Deserialize, Serialize};

use super::auth::AuthConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;

const LOCAL_CONFIG: &str = "servizor.toml";
const SYSTEM_CONFIG: &str = "/etc/servizor/config.toml";

/// Runtime configuration for servizor
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. servizor.toml in current directory
    /// 3. /etc/servizor/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied on top of whichever was loaded.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        let auth = &mut self.auth;
        override_field(&mut auth.auth_url, overrides.auth_url);
        override_field(&mut auth.username, overrides.username);
        override_field(&mut auth.user_id, overrides.user_id);
        override_field(&mut auth.password, overrides.password);
        override_field(&mut auth.user_domain_name, overrides.user_domain_name);
        override_field(&mut auth.user_domain_id, overrides.user_domain_id);
        override_field(&mut auth.project_name, overrides.project_name);
        override_field(&mut auth.project_id, overrides.project_id);
        override_field(&mut auth.project_domain_name, overrides.project_domain_name);
        override_field(&mut auth.project_domain_id, overrides.project_domain_id);
        override_field(&mut auth.token, overrides.token);
        override_field(&mut auth.region_name, overrides.region_name);
        if let Some(endpoint_type) = overrides.endpoint_type.filter(|s| !s.is_empty()) {
            auth.endpoint_type = endpoint_type;
        }
        if overrides.insecure {
            auth.insecure = true;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Checks that there is enough to authenticate against the identity service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let auth = &self.auth;
        if auth.auth_url.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Validation(
                "No auth URL given, use --os-auth-url or OS_AUTH_URL".to_string(),
            ));
        }

        if auth.uses_token() {
            return Ok(());
        }

        if auth.username.is_none() && auth.user_id.is_none() {
            return Err(ConfigError::Validation(
                "Either a token or a username/user id is required".to_string(),
            ));
        }
        if auth.password.is_none() {
            return Err(ConfigError::Validation(
                "A password is required for password authentication".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file that would be used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Empty strings count as unset, matching how unset `OS_*` variables arrive.
fn override_field(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *field = Some(value);
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
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
    pub token: Option<String>,
    pub region_name: Option<String>,
    pub endpoint_type: Option<String>,
    pub insecure: bool,
    pub log_level: Option<String>,
}
