use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use servizor_domain::{CliOverrides, Config};
use std::path::PathBuf;
use tracing::{error, info};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "servizor")]
#[command(version)]
#[command(about = "Registers services and endpoints in the OpenStack identity catalog")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// More output, repeat for debug
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Debug output, including the full error chain on failure
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    os: OsOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct OsOptions {
    /// Identity service URL
    #[arg(long, env = "OS_AUTH_URL", global = true)]
    os_auth_url: Option<String>,

    #[arg(long, env = "OS_USERNAME", global = true)]
    os_username: Option<String>,

    #[arg(long, env = "OS_USER_ID", global = true)]
    os_user_id: Option<String>,

    #[arg(long, env = "OS_PASSWORD", hide_env_values = true, global = true)]
    os_password: Option<String>,

    #[arg(long, env = "OS_USER_DOMAIN_NAME", global = true)]
    os_user_domain_name: Option<String>,

    #[arg(long, env = "OS_USER_DOMAIN_ID", global = true)]
    os_user_domain_id: Option<String>,

    #[arg(long, env = "OS_PROJECT_NAME", global = true)]
    os_project_name: Option<String>,

    #[arg(long, env = "OS_PROJECT_ID", global = true)]
    os_project_id: Option<String>,

    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME", global = true)]
    os_project_domain_name: Option<String>,

    #[arg(long, env = "OS_PROJECT_DOMAIN_ID", global = true)]
    os_project_domain_id: Option<String>,

    /// Pre-issued token, skips password authentication
    #[arg(long, env = "OS_SERVICE_TOKEN", hide_env_values = true, global = true)]
    os_token: Option<String>,

    #[arg(long, env = "OS_TOKEN", hide = true, hide_env_values = true, global = true)]
    os_auth_token: Option<String>,

    /// Same as --os-project-name
    #[arg(long, env = "OS_TENANT_NAME", global = true)]
    os_tenant_name: Option<String>,

    /// Same as --os-project-id
    #[arg(long, env = "OS_TENANT_ID", global = true)]
    os_tenant_id: Option<String>,

    /// Domain of the project when no project domain is given
    #[arg(long, env = "OS_DOMAIN_NAME", global = true)]
    os_domain_name: Option<String>,

    #[arg(long, env = "OS_DOMAIN_ID", global = true)]
    os_domain_id: Option<String>,

    #[arg(long, env = "OS_REGION_NAME", global = true)]
    os_region_name: Option<String>,

    /// Interface of the identity endpoint to use (public, internal, admin)
    #[arg(long, env = "OS_ENDPOINT_TYPE", global = true)]
    os_endpoint_type: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create or update services and endpoints from definition files
    Install {
        /// YAML definition file, may be repeated
        #[arg(short = 'f', long = "file", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Environment whose parameters fill in the endpoint URLs
        #[arg(short = 'e', long)]
        environment: String,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let os = &self.os;
        CliOverrides {
            auth_url: os.os_auth_url.clone(),
            username: os.os_username.clone(),
            user_id: os.os_user_id.clone(),
            password: os.os_password.clone(),
            user_domain_name: os.os_user_domain_name.clone(),
            user_domain_id: os.os_user_domain_id.clone(),
            project_name: either(&os.os_project_name, &os.os_tenant_name),
            project_id: either(&os.os_project_id, &os.os_tenant_id),
            project_domain_name: either(&os.os_project_domain_name, &os.os_domain_name),
            project_domain_id: either(&os.os_project_domain_id, &os.os_domain_id),
            token: either(&os.os_token, &os.os_auth_token),
            region_name: os.os_region_name.clone(),
            endpoint_type: os.os_endpoint_type.clone(),
            insecure: os.insecure,
            log_level: None,
        }
    }

    fn verbosity(&self) -> bootstrap::Verbosity {
        bootstrap::Verbosity {
            verbose: self.verbose,
            quiet: self.quiet,
            debug: self.debug,
        }
    }
}

/// The first of two options that is set to a non-empty value.
fn either(preferred: &Option<String>, fallback: &Option<String>) -> Option<String> {
    preferred
        .iter()
        .chain(fallback)
        .find(|v| !v.is_empty())
        .cloned()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let loaded = bootstrap::load_config(cli.config.as_deref(), cli.overrides());
    let fallback = Config::default();
    bootstrap::init_logging(cli.verbosity(), loaded.as_ref().unwrap_or(&fallback));

    let result = match loaded {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        if cli.debug {
            error!("{:?}", e);
        }
        std::process::exit(1);
    }
}

async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Install { files, environment } => install(&files, &environment, config).await,
    }
}

async fn install(files: &[PathBuf], environment: &str, config: Config) -> anyhow::Result<()> {
    // Everything local is checked before the first remote call.
    let local = di::LocalUseCases::new();
    let definitions = local
        .load_definitions
        .execute(files)
        .context("Failed to load definitions")?;
    definitions.environment(environment)?;
    config.validate()?;

    let remote = di::RemoteUseCases::connect(&config.auth)
        .await
        .context("Failed to authenticate")?;
    let report = remote
        .reconcile_catalog
        .execute(&definitions, environment)
        .await
        .with_context(|| format!("Failed to install environment {}", environment))?;

    info!(
        services_created = report.services_created,
        services_updated = report.services_updated,
        services_without_endpoints = report.services_without_endpoints,
        endpoints_created = report.endpoints_created,
        endpoints_updated = report.endpoints_updated,
        "Install complete"
    );
    Ok(())
}
