//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use std::time::Duration;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Create context for commands
    let ctx = commands::Context {
        server: cli.server,
        token: cli.token,
        timeout: Duration::from_secs(cli.timeout),
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Cacerts(args) => commands::cacerts::execute(ctx, args).await,
        Commands::Get(args) => commands::get::execute(ctx, args).await,
        Commands::Plan => commands::plan::execute(ctx).await,
    }
}

/// Diagnostics go to stderr so payload output stays clean on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
