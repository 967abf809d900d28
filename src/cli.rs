use std::path::{Path, PathBuf};

mod browse;
mod config;
mod employees;
mod health;
mod request;
mod requests;
mod settings;
mod terminal;

use anyhow::Context as _;
use browse::Browse;
use clap::ArgAction;
use config::Config;
use employees::Employees;
use health::Health;
use request::Request;
use requests::Requests;
use resalloc::{EmployeeClient, InsiderClient, MatchClient, domain::config::Service};
use settings::Settings;

/// Default location of the configuration file.
const DEFAULT_CONFIG: &str = "resalloc.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Requests(Requests::default()))
            .run(&self.config)
            .await
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List resource requests (default)
    Requests(Requests),

    /// Show a resource request with its lines and assignees
    ///
    /// With `--suggest`, the request is also sent to the AI matching service
    /// and the ranked candidates are shown.
    Request(Request),

    /// List employees and their skills
    Employees(Employees),

    /// Show the matching criteria weights and confidence threshold
    Settings(Settings),

    /// Check that the AI matching service is up
    Health(Health),

    /// Browse resource requests interactively
    Browse(Browse),

    /// Create or show the configuration file
    Config(Config),
}

impl Command {
    async fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let context = || Context::load(config_path);

        match self {
            Self::Requests(command) => command.run(&context()?).await?,
            Self::Request(command) => command.run(&context()?).await?,
            Self::Employees(command) => command.run(&context()?).await?,
            Self::Settings(command) => command.run(&context()?),
            Self::Health(command) => command.run(&context()?).await?,
            Self::Browse(command) => command.run(&context()?).await?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Effective configuration and the HTTP client shared by every service
/// client of one command.
#[derive(Debug)]
pub struct Context {
    config: resalloc::Config,
    http: reqwest::Client,
}

impl Context {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = resalloc::Config::load_or_default(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        config.apply_env();
        config.validate()?;
        tracing::debug!(?config, "effective configuration");

        Ok(Self::new(config))
    }

    fn new(config: resalloc::Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    const fn config(&self) -> &resalloc::Config {
        &self.config
    }

    fn insider(&self) -> anyhow::Result<InsiderClient> {
        Ok(InsiderClient::new(
            self.http.clone(),
            self.config.endpoint(Service::Insider)?,
            self.config.token(),
        ))
    }

    fn employees(&self) -> anyhow::Result<EmployeeClient> {
        Ok(EmployeeClient::new(
            self.http.clone(),
            self.config.endpoint(Service::EmpInfo)?,
            self.config.token(),
        ))
    }

    fn matcher(&self) -> anyhow::Result<MatchClient> {
        Ok(MatchClient::new(
            self.http.clone(),
            self.config.endpoint(Service::Matcher)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    /// A context whose services all live at `base_url`.
    pub fn context_for(base_url: &str) -> Context {
        let mut config = resalloc::Config::default();
        config.set_endpoint(Service::Insider, base_url);
        config.set_endpoint(Service::EmpInfo, base_url);
        config.set_endpoint(Service::Matcher, base_url);
        config.set_token("token");
        Context::new(config)
    }

    #[test]
    fn no_subcommand_defaults_to_request_list() {
        let cli = Cli::try_parse_from(["resalloc", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_path_is_global() {
        let cli = Cli::try_parse_from(["resalloc", "requests", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let context = Context::new(resalloc::Config::default());
        let error = context.insider().unwrap_err();
        assert!(error.to_string().contains("INSIDER_API"));
    }
}
