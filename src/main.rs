// ABOUTME: Entry point for the stolos CLI application.
// ABOUTME: Parses arguments and dispatches to the command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use stolos::deploy::DeployOpts;
use stolos::error::Result;
use stolos::output::OutputMode;
use stolos::types::Namespace;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            compose_files,
            namespace,
            timeout,
            quiet,
            json,
        } => {
            let mode = if json {
                OutputMode::Json
            } else if quiet {
                OutputMode::Quiet
            } else {
                OutputMode::Normal
            };
            let namespace = Namespace::new(&namespace)?;
            let opts = DeployOpts {
                namespace,
                compose_files,
                timeout,
            };
            commands::deploy::deploy(opts, mode).await
        }
    }
}
