mod auth;
mod errors;
mod logging;
mod root;

pub use auth::AuthConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
