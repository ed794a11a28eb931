//! Trusted fetcher built on top of the bootstrap protocol.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use reqwest::{Certificate, Client as HttpClient, StatusCode};
use tracing::debug;
use url::Url;

use drover_core::{CaBundle, DroverError, Fetched, Result, TokenScope};

use crate::bootstrap::{endpoint, excerpt, parse_server, Bootstrapper, DEFAULT_TIMEOUT};
use crate::token::{PassthroughResolver, ResolvedToken, TokenResolver};

/// Client for fetching resources from a management server whose CA is
/// established trust-on-first-use.
///
/// Every call bootstraps (or confirms) trust, builds a client scoped to
/// that call, performs a single request, and releases the connection. No
/// client state is shared across calls, so concurrent fetches from
/// multiple tasks need no coordination.
#[derive(Clone)]
pub struct DroverClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    server: Url,
    token: String,
    timeout: Duration,
    resolver: Arc<dyn TokenResolver>,
}

impl DroverClient {
    /// Create a client with default settings.
    pub fn new(server: &str, token: impl Into<String>) -> Result<Self> {
        Self::builder(server, token).build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder(server: &str, token: impl Into<String>) -> DroverClientBuilder {
        DroverClientBuilder::new(server, token)
    }

    /// Fetch a resource with cluster-token semantics.
    ///
    /// No credential accompanies the resource request; the token only
    /// verifies the CA bundle.
    pub async fn get(&self, path: &str) -> Result<Fetched> {
        self.fetch(path, TokenScope::Cluster).await
    }

    /// Fetch a resource with machine-token semantics.
    ///
    /// The token is resolved first and may route the whole retrieval
    /// through a hardware channel.
    pub async fn machine_get(&self, path: &str) -> Result<Fetched> {
        self.fetch(path, TokenScope::Machine).await
    }

    /// Retrieve the verified CA bundle without fetching anything else.
    pub async fn ca_certs(&self, scope: TokenScope) -> Result<CaBundle> {
        let resolved = self.resolve(scope).await?;
        self.bootstrapper(resolved.token).ca_certs(scope).await
    }

    async fn fetch(&self, path: &str, scope: TokenScope) -> Result<Fetched> {
        let resolved = self.resolve(scope).await?;
        let bundle = self
            .bootstrapper(resolved.token.clone())
            .ca_certs(scope)
            .await?;
        let url = endpoint(&self.inner.server, path)?;
        let ca_checksum = bundle.checksum().map(str::to_string);

        if resolved.hardware_backed {
            debug!(url = %url, "fetching over hardware token channel");
            let body = self.inner.resolver.fetch(&bundle, url.as_str()).await?;
            return Ok(Fetched { body, ca_checksum });
        }

        let client = trusted_client(&bundle, self.inner.timeout)?;
        debug!(url = %url, pinned = !bundle.is_system_trust(), "GET request");

        let mut request = client.get(url.clone());
        if scope.is_machine() {
            request = request.bearer_auth(B64.encode(resolved.token.as_bytes()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DroverError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DroverError::Http(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(DroverError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: excerpt(&body),
            });
        }

        Ok(Fetched { body: body.to_vec(), ca_checksum })
    }

    /// Resolve the configured token for the given scope. Cluster tokens
    /// are used as given; machine tokens go through the resolver so the
    /// bearer and keyed-hash flows never see an unresolved reference.
    async fn resolve(&self, scope: TokenScope) -> Result<ResolvedToken> {
        if scope.is_machine() {
            self.inner.resolver.resolve(&self.inner.token).await
        } else {
            Ok(ResolvedToken {
                hardware_backed: false,
                token: self.inner.token.clone(),
            })
        }
    }

    fn bootstrapper(&self, token: String) -> Bootstrapper {
        Bootstrapper::from_parts(self.inner.server.clone(), token, self.inner.timeout)
    }
}

/// Build a per-call client trusting exactly the given bundle, or the
/// default store when none was pinned.
fn trusted_client(bundle: &CaBundle, timeout: Duration) -> Result<HttpClient> {
    let mut builder = HttpClient::builder().timeout(timeout);

    if let Some(pem) = bundle.pem() {
        let certs = Certificate::from_pem_bundle(pem)
            .map_err(|e| DroverError::InvalidCaBundle(e.to_string()))?;
        if certs.is_empty() {
            return Err(DroverError::InvalidCaBundle(
                "no certificates in bundle".to_string(),
            ));
        }
        builder = builder.tls_built_in_root_certs(false);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder
        .build()
        .map_err(|e| DroverError::Http(format!("building HTTP client: {e}")))
}

/// Builder for configuring a [`DroverClient`]
pub struct DroverClientBuilder {
    server: String,
    token: String,
    timeout: Duration,
    resolver: Arc<dyn TokenResolver>,
}

impl DroverClientBuilder {
    /// Create a new builder with the given server address and join token.
    #[must_use]
    pub fn new(server: &str, token: impl Into<String>) -> Self {
        Self {
            server: server.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            resolver: Arc::new(PassthroughResolver),
        }
    }

    /// Set the per-round-trip timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Install a token resolver for hardware-backed machine tokens.
    #[must_use]
    pub fn token_resolver(mut self, resolver: impl TokenResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Build the client, validating the server address.
    pub fn build(self) -> Result<DroverClient> {
        let server = parse_server(&self.server)?;
        Ok(DroverClient {
            inner: Arc::new(ClientInner {
                server,
                token: self.token,
                timeout: self.timeout,
                resolver: self.resolver,
            }),
        })
    }
}
