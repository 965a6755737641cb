//! Deadjoin CLI - find the joins and views your BI content never uses

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{audit, extract, graph};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        cli::Commands::Audit(args) => audit::execute(args, &cli.global).await,
        cli::Commands::Extract(args) => extract::execute(args, &cli.global).await,
        cli::Commands::Graph(args) => graph::execute(args, &cli.global).await,
    };

    if let Err(err) = &result {
        if let Some(code) = err.downcast_ref::<ExitCode>() {
            std::process::exit(code.0);
        }
    }
    result
}
