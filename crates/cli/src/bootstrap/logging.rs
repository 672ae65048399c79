use servizor_domain::Config;
use tracing_subscriber::EnvFilter;

/// Verbosity requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    pub verbose: u8,
    pub quiet: bool,
    pub debug: bool,
}

impl Verbosity {
    /// Level implied by the flags, `None` when no flag was given.
    fn level(&self) -> Option<&'static str> {
        if self.debug || self.verbose >= 2 {
            Some("debug")
        } else if self.verbose == 1 {
            Some("info")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

fn filter_directive(verbosity: Verbosity, config: &Config) -> String {
    let level = match verbosity.level() {
        Some(level) => level.to_string(),
        None => config.logging.level.clone(),
    };
    if level == "debug" || level == "trace" {
        level
    } else {
        format!("{},reqwest=warn,hyper=warn,hyper_util=warn", level)
    }
}

/// Logs to stderr. `RUST_LOG` takes precedence over the flags and the config.
pub fn init_logging(verbosity: Verbosity, config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity, config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
