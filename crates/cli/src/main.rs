//! CLI entry point for a cache node.

use clap::Parser;
use cli::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    cli::logging::init(&config.log_level, config.log_json)?;
    config.run().await
}
