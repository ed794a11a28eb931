//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};

/// Trust-on-first-use bootstrap client for cluster management servers
///
/// Retrieves a server's CA bundle with token-verified integrity, then
/// fetches protected resources over the pinned trust root.
#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Management server URL (or set DROVER_SERVER env var)
    #[arg(short, long, env = "DROVER_SERVER", global = true)]
    pub server: Option<String>,

    /// Join token (or set DROVER_TOKEN env var)
    #[arg(short, long, env = "DROVER_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "5")]
    pub timeout: u64,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve and verify the server's CA bundle
    Cacerts(CacertsArgs),

    /// Fetch a protected resource over the bootstrapped trust root
    Get(GetArgs),

    /// Emit provisioning descriptors for installing the CA bundle
    Plan,
}

// ============================================================================
// Cacerts command
// ============================================================================

#[derive(Args, Debug)]
pub struct CacertsArgs {
    /// Use the machine token endpoint
    #[arg(long)]
    pub machine: bool,

    /// Print the bundle checksum instead of the PEM
    #[arg(long)]
    pub checksum: bool,
}

// ============================================================================
// Get command
// ============================================================================

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource path, e.g. /v1-rancheros/plan
    pub path: String,

    /// Resolve the token and authenticate as a machine
    #[arg(long)]
    pub machine: bool,
}
