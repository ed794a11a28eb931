//! `drover plan` - Emit provisioning descriptors for the CA bundle.
//!
//! Output is a JSON fragment for the provisioning agent: the bundle file
//! plus the trust-store refresh instruction.

use anyhow::Result;
use drover::plan::{ca_cert_file, update_ca_certificates_instruction};

use super::Context;

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;

    let file = ca_cert_file(&client).await?;
    let instruction = update_ca_certificates_instruction();

    let plan = serde_json::json!({
        "files": [file],
        "instructions": [instruction],
    });
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
