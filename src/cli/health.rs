use clap::Parser;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Probe the AI matching service")]
pub struct Health {}

impl Health {
    #[instrument(level = "debug", skip_all)]
    pub async fn run(self, context: &Context) -> anyhow::Result<()> {
        let health = context.matcher()?.health().await?;

        if health.is_healthy() {
            println!("{}", format!("AI matching service: {}", health.status).success());
            Ok(())
        } else {
            anyhow::bail!("AI matching service reports '{}'", health.status)
        }
    }
}
