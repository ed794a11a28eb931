//! Shared types for trust bootstrap and provisioning descriptors.

use serde::{Deserialize, Serialize};

/// A certificate-authority bundle obtained from a management server.
///
/// A `Pinned` bundle is only ever constructed after the bootstrap
/// exchange passed its keyed-hash integrity check; no other code path
/// treats remote bytes as trust roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaBundle {
    /// The server presents a certificate the default trust store already
    /// verifies; there is nothing to pin.
    SystemTrust,
    /// A verified PEM bundle and its content digest.
    Pinned {
        /// Raw PEM bytes exactly as served
        pem: Vec<u8>,
        /// Lowercase hex SHA-256 of `pem`
        checksum: String,
    },
}

impl CaBundle {
    /// Returns the PEM bytes if a bundle was pinned
    #[must_use]
    pub fn pem(&self) -> Option<&[u8]> {
        match self {
            Self::SystemTrust => None,
            Self::Pinned { pem, .. } => Some(pem),
        }
    }

    /// Returns the bundle digest if a bundle was pinned
    #[must_use]
    pub fn checksum(&self) -> Option<&str> {
        match self {
            Self::SystemTrust => None,
            Self::Pinned { checksum, .. } => Some(checksum),
        }
    }

    /// Returns true when the default trust store suffices
    #[must_use]
    pub const fn is_system_trust(&self) -> bool {
        matches!(self, Self::SystemTrust)
    }
}

/// Which flavor of join token a request carries.
///
/// The scope selects the well-known bootstrap endpoint and whether the
/// token is eligible for hardware unsealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    /// Cluster-scoped join token
    Cluster,
    /// Machine-scoped token, eligible for hardware unsealing
    Machine,
}

impl TokenScope {
    /// Returns true for machine-scoped requests
    #[must_use]
    pub const fn is_machine(self) -> bool {
        matches!(self, Self::Machine)
    }
}

/// A protected resource fetched from the management server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Raw response body
    pub body: Vec<u8>,
    /// Digest of the CA bundle the connection was pinned to, if one was
    /// pinned
    pub ca_checksum: Option<String>,
}

/// Declarative "run this command" step consumed by the provisioning agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Step name, unique within a plan
    pub name: String,
    /// Whether the agent captures and reports the command output
    pub save_output: bool,
    /// Program to execute
    pub command: String,
}

/// Declarative "write this file" step consumed by the provisioning agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Base64-encoded file content
    pub content: String,
    /// Absolute destination path
    pub path: String,
    /// Octal permission string, e.g. "0644"
    pub permissions: String,
}
