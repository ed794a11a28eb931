//! drover - trust-on-first-use bootstrap CLI.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    drover_cli::run().await
}
