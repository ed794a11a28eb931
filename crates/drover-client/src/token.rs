//! Token resolution seam for hardware-backed join tokens.

use async_trait::async_trait;

use drover_core::{CaBundle, DroverError, Result};

/// Outcome of resolving a token reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Whether retrieval must go through the hardware channel
    pub hardware_backed: bool,
    /// The resolved token value
    pub token: String,
}

/// Strategy for resolving machine token references before use.
///
/// Machine tokens may be opaque references to hardware-sealed secrets. A
/// resolver turns the reference into a usable token and, for hardware-backed
/// tokens, owns the retrieval channel itself. The bearer and keyed-hash
/// flows only ever see resolved tokens.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    /// Resolve a token reference into a usable token.
    async fn resolve(&self, token: &str) -> Result<ResolvedToken>;

    /// Retrieve a resource over the hardware channel.
    ///
    /// Only called after [`resolve`](Self::resolve) reported a
    /// hardware-backed token; `ca_certs` is the verified bundle for the
    /// connection.
    async fn fetch(&self, ca_certs: &CaBundle, url: &str) -> Result<Vec<u8>>;
}

/// Default resolver: every token is used as given, no hardware channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

#[async_trait]
impl TokenResolver for PassthroughResolver {
    async fn resolve(&self, token: &str) -> Result<ResolvedToken> {
        Ok(ResolvedToken {
            hardware_backed: false,
            token: token.to_string(),
        })
    }

    async fn fetch(&self, _ca_certs: &CaBundle, url: &str) -> Result<Vec<u8>> {
        Err(DroverError::Hardware(format!(
            "no hardware channel available for {url}"
        )))
    }
}
