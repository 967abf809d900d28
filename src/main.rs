//! Command-line dashboard for resource requests, employees and AI match
//! suggestions.

use clap::Parser;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run().await
}
