// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "stolos")]
#[command(about = "Deploy compose stacks to Kubernetes and wait for them to stabilize")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a stack to the target namespace
    Deploy {
        /// Compose file describing the stack (repeatable; later files override)
        #[arg(short = 'c', long = "compose-file")]
        compose_files: Vec<PathBuf>,

        /// Target namespace; doubles as the stack name
        #[arg(short, long)]
        namespace: String,

        /// Give up if the stack is not stable within this duration (e.g. 5m)
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,

        /// Only print the final result
        #[arg(long, conflicts_with = "json")]
        quiet: bool,

        /// Emit JSON events instead of human-readable output
        #[arg(long)]
        json: bool,
    },
}
