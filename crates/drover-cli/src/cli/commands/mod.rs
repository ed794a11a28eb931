//! Command implementations.

pub mod cacerts;
pub mod get;
pub mod plan;

use std::time::Duration;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Management server URL
    pub server: Option<String>,

    /// Join token
    pub token: Option<String>,

    /// Per-round-trip timeout
    pub timeout: Duration,
}

impl Context {
    /// Get the server URL, returning an error if not set.
    pub fn require_server(&self) -> anyhow::Result<&str> {
        self.server.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "server URL required.\n\n\
                 Set it with one of:\n  \
                 1. --server <URL>\n  \
                 2. DROVER_SERVER environment variable"
            )
        })
    }

    /// Get the join token, returning an error if not set.
    pub fn require_token(&self) -> anyhow::Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "join token required.\n\n\
                 Set it with one of:\n  \
                 1. --token <TOKEN>\n  \
                 2. DROVER_TOKEN environment variable"
            )
        })
    }

    /// Create a client for the configured server and token.
    pub fn client(&self) -> anyhow::Result<drover::DroverClient> {
        let server = self.require_server()?;
        let token = self.require_token()?;
        Ok(drover::DroverClient::builder(server, token)
            .timeout(self.timeout)
            .build()?)
    }
}
