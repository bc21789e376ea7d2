mod cli;
mod client;
mod config;
mod error;
mod output;
mod report;
mod tracker;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    output::print_banner();
    info!("autopr {} starting", env!("CARGO_PKG_VERSION"));

    cli.execute().await
}
