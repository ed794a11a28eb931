//! Provisioning descriptors for installing a bootstrapped CA bundle.
//!
//! These feed the declarative plan consumed by the provisioning agent on
//! the node; they carry data only and run nothing themselves.

use base64::{engine::general_purpose::STANDARD as B64, Engine};

use drover_core::{File, Instruction, Result, TokenScope};

use crate::client::DroverClient;

/// Trust-store refresh command run by the provisioning agent
const UPDATE_CA_CERTIFICATES: &str = "update-ca-certificates";

/// Destination for the pinned bundle on provisioned hosts
const CA_CERT_PATH: &str = "/etc/pki/trust/anchors/additional-ca.pem";

/// Instruction telling the provisioning agent to refresh the system trust
/// store once the CA bundle file is in place.
#[must_use]
pub fn update_ca_certificates_instruction() -> Instruction {
    Instruction {
        name: UPDATE_CA_CERTIFICATES.to_string(),
        save_output: true,
        command: UPDATE_CA_CERTIFICATES.to_string(),
    }
}

/// File descriptor carrying the server's verified CA bundle.
///
/// The bundle comes from a cluster-scoped bootstrap over the given
/// client, so the caller's configuration (timeout, resolver) applies.
/// The content is empty when the system trust store suffices; the
/// descriptor is still emitted so the plan shape stays stable.
pub async fn ca_cert_file(client: &DroverClient) -> Result<File> {
    let bundle = client.ca_certs(TokenScope::Cluster).await?;
    let content = bundle.pem().map(|pem| B64.encode(pem)).unwrap_or_default();

    Ok(File {
        content,
        path: CA_CERT_PATH.to_string(),
        permissions: "0644".to_string(),
    })
}
