//! `drover get` - Fetch a protected resource over the bootstrapped trust root.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use super::Context;
use crate::cli::args::GetArgs;

pub async fn execute(ctx: Context, args: GetArgs) -> Result<()> {
    let client = ctx.client()?;

    let fetched = if args.machine {
        client.machine_get(&args.path).await?
    } else {
        client.get(&args.path).await?
    };

    if let Some(checksum) = &fetched.ca_checksum {
        debug!(checksum = %checksum, "fetched over pinned bundle");
    }

    std::io::stdout().write_all(&fetched.body)?;
    Ok(())
}
