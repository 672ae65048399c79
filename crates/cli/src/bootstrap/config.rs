use anyhow::Context;
use servizor_domain::{CliOverrides, Config};
use tracing::debug;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    match path.map(str::to_string).or_else(Config::get_config_path) {
        Some(file) => debug!(file = %file, "Configuration loaded"),
        None => debug!("No configuration file, using defaults"),
    }
    Ok(config)
}
