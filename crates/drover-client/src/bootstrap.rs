//! Trust-on-first-use retrieval of a management server's CA bundle.
//!
//! A joining node holds nothing but a join token, so the server's CA bundle
//! has to come over a channel the node cannot yet verify. The
//! [`Bootstrapper`] first probes the well-known endpoint through the
//! default trust store; if the server's certificate already checks out
//! there is nothing to pin. Only when that probe fails at the transport
//! level does it fall back to an exchange over an unverified connection,
//! in which the response is accepted solely on the strength of a keyed
//! hash over a fresh nonce and the body, with the token as the key.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use tracing::debug;
use url::Url;

use drover_core::{CaBundle, DroverError, Result, TokenScope};

use crate::hash;

/// Well-known CA bundle endpoint for cluster tokens
const CACERTS_PATH: &str = "/cacerts";

/// Well-known CA bundle endpoint for machine tokens
const MACHINE_CACERTS_PATH: &str = "/v1-rancheros/cacerts";

/// Request header carrying the client nonce
const HEADER_NONCE: &str = "X-Cattle-Nonce";

/// Response header carrying the keyed hash
const HEADER_HASH: &str = "X-Cattle-Hash";

/// Timeout applied to every round trip
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest response-body excerpt embedded in protocol errors
const BODY_EXCERPT_CHARS: usize = 256;

/// Retrieves and verifies a server's CA bundle using only a shared token.
#[derive(Clone)]
pub struct Bootstrapper {
    server: Url,
    token: String,
    timeout: Duration,
}

impl Bootstrapper {
    /// Create a bootstrapper for the given server address and join token.
    ///
    /// The address must be an absolute http(s) URL; its path is replaced
    /// with the well-known endpoint per request.
    pub fn new(server: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self::from_parts(parse_server(server)?, token.into(), DEFAULT_TIMEOUT))
    }

    pub(crate) const fn from_parts(server: Url, token: String, timeout: Duration) -> Self {
        Self { server, token, timeout }
    }

    /// Override the per-round-trip timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retrieve the server's CA bundle, verified against the join token.
    ///
    /// Returns [`CaBundle::SystemTrust`] when the default trust store
    /// already verifies the server, or when the server explicitly serves
    /// an empty (verified) bundle. Otherwise returns the pinned PEM bytes
    /// together with their SHA-256 checksum.
    pub async fn ca_certs(&self, scope: TokenScope) -> Result<CaBundle> {
        let nonce = hash::nonce()?;
        let url = endpoint(&self.server, cacerts_path(scope))?;

        if self.probe(&url).await {
            return Ok(CaBundle::SystemTrust);
        }

        self.exchange(&url, &nonce).await
    }

    /// First contact through the default trust store.
    ///
    /// Any response at all, whatever the status, means the server presents
    /// a certificate the node can already verify. Only transport-level
    /// failure leads on to the token-verified exchange.
    async fn probe(&self, url: &Url) -> bool {
        let Ok(client) = HttpClient::builder().timeout(self.timeout).build() else {
            return false;
        };

        match client.get(url.clone()).send().await {
            Ok(response) => {
                debug!(url = %url, status = response.status().as_u16(), "server verified by default trust store");
                true
            }
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed, falling back to token-verified exchange");
                false
            }
        }
    }

    /// Token-verified exchange over a connection that skips certificate
    /// verification.
    ///
    /// The response body is trusted only after the `X-Cattle-Hash` header
    /// matches a locally computed `HMAC-SHA512(token, nonce||0||body||0)`.
    /// On mismatch the body is discarded entirely.
    async fn exchange(&self, url: &Url, nonce: &str) -> Result<CaBundle> {
        let client = HttpClient::builder()
            .danger_accept_invalid_certs(true)
            .timeout(self.timeout)
            .build()
            .map_err(|e| DroverError::Http(format!("building insecure client: {e}")))?;

        debug!(url = %url, "requesting CA bundle over unverified connection");

        let response = client
            .get(url.clone())
            .header(HEADER_NONCE, nonce)
            .bearer_auth(hash::token_digest(&self.token))
            .send()
            .await
            .map_err(|e| DroverError::Http(format!("insecure cacerts download from {url}: {e}")))?;

        let status = response.status();
        let received = response
            .headers()
            .get(HEADER_HASH)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| DroverError::Http(format!("reading cacerts response from {url}: {e}")))?;

        if status != StatusCode::OK {
            return Err(DroverError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: excerpt(&body),
            });
        }

        let computed = hash::response_hash(&self.token, nonce, &body);
        if received != computed {
            return Err(DroverError::HashMismatch { received, computed });
        }

        if body.is_empty() {
            return Ok(CaBundle::SystemTrust);
        }

        let checksum = hash::sha256_hex(&body);
        debug!(checksum = %checksum, bytes = body.len(), "verified CA bundle");
        Ok(CaBundle::Pinned { pem: body.to_vec(), checksum })
    }
}

/// The well-known endpoint path for a token scope.
const fn cacerts_path(scope: TokenScope) -> &'static str {
    match scope {
        TokenScope::Cluster => CACERTS_PATH,
        TokenScope::Machine => MACHINE_CACERTS_PATH,
    }
}

/// Parse and validate a server address. Only absolute http(s) URLs are
/// accepted.
pub(crate) fn parse_server(server: &str) -> Result<Url> {
    let url = Url::parse(server).map_err(|e| DroverError::InvalidUrl(format!("{server}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DroverError::InvalidUrl(format!(
            "{server}: unsupported scheme {other:?}"
        ))),
    }
}

/// Join a request path onto the server address, replacing any existing path.
pub(crate) fn endpoint(server: &Url, path: &str) -> Result<Url> {
    server
        .join(path)
        .map_err(|e| DroverError::InvalidUrl(format!("{server}{path}: {e}")))
}

/// Shorten a response body for inclusion in an error message.
pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut out: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if out.len() < text.len() {
        out.push_str("...");
    }
    out
}
