use std::path::Path;

use anyhow::Context as _;
use clap::Parser;
use resalloc::domain::config::Service;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, Parser)]
enum ConfigCommand {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration, including environment overrides
    Show,
}

impl Config {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Init { force } => {
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                resalloc::Config::default()
                    .save(path)
                    .with_context(|| format!("failed to write {}", path.display()))?;

                println!("{}", format!("Created {}", path.display()).success());
                println!();
                println!("Set the service URLs in the file or through the environment:");
                for service in [Service::Insider, Service::EmpInfo, Service::Matcher] {
                    println!("  {:<12} {}", service.env_var(), service.description().dim());
                }
            }
            ConfigCommand::Show => {
                let mut config = resalloc::Config::load_or_default(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                config.apply_env();

                println!("Configuration ({}):", path.display());
                for service in [Service::Insider, Service::EmpInfo, Service::Matcher] {
                    let value = config
                        .endpoint(service)
                        .map_or_else(|_| "not configured".warning(), str::to_string);
                    println!("  {:<12} {value}", service.key());
                }
                println!(
                    "  {:<12} {}",
                    "token",
                    if config.token().is_some() {
                        "set".to_string()
                    } else {
                        "not set".dim()
                    }
                );
                println!("  {:<12} {}", "page_size", config.page_size());

                if let Err(error) = config.validate() {
                    println!("\n{}", error.to_string().warning());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn init_writes_default_config() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("resalloc.toml");

        let init = Config {
            command: ConfigCommand::Init { force: false },
        };
        init.run(&path).expect("config init should succeed");

        let config = resalloc::Config::load(&path).unwrap();
        assert_eq!(config, resalloc::Config::default());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("resalloc.toml");
        std::fs::write(&path, "").unwrap();

        let init = Config {
            command: ConfigCommand::Init { force: false },
        };
        assert!(init.run(&path).is_err());

        let forced = Config {
            command: ConfigCommand::Init { force: true },
        };
        forced.run(&path).expect("forced init should succeed");
    }

    #[test]
    fn show_tolerates_missing_file() {
        let tmp = tempdir().unwrap();
        let show = Config {
            command: ConfigCommand::Show,
        };
        show.run(&tmp.path().join("absent.toml"))
            .expect("config show should succeed");
    }
}
