//! `drover cacerts` - Retrieve and verify the server's CA bundle.

use std::io::Write;

use anyhow::Result;
use drover::TokenScope;

use super::Context;
use crate::cli::args::CacertsArgs;

pub async fn execute(ctx: Context, args: CacertsArgs) -> Result<()> {
    let client = ctx.client()?;
    let scope = if args.machine {
        TokenScope::Machine
    } else {
        TokenScope::Cluster
    };

    let bundle = client.ca_certs(scope).await?;

    match (bundle.pem(), bundle.checksum()) {
        (Some(pem), Some(checksum)) => {
            if args.checksum {
                println!("{checksum}");
            } else {
                std::io::stdout().write_all(pem)?;
            }
        }
        _ => eprintln!("system trust store suffices; no bundle pinned"),
    }

    Ok(())
}
