//! In-process TLS server for exercising the full bootstrap flow.
//!
//! The server presents a certificate signed by its own throwaway CA, so a
//! verifying probe fails and the client has to run the token-verified
//! exchange. Wire hashes are computed here with `hmac`/`sha2`,
//! independently of the client's own implementation.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use hmac::{Hmac, Mac};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair, SanType,
};
use sha2::{Digest, Sha256, Sha512};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::{self, ServerConfig};
use tokio_rustls::TlsAcceptor;

type HmacSha512 = Hmac<Sha512>;

/// Keyed response hash computed independently of the client under test.
pub fn wire_hash(token: &str, nonce: &str, body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(token.as_bytes()).expect("any key length works");
    mac.update(nonce.as_bytes());
    mac.update(&[0]);
    mac.update(body);
    mac.update(&[0]);
    B64.encode(mac.finalize().into_bytes())
}

/// Lowercase hex SHA-256, computed independently of the client under test.
pub fn body_checksum(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Bearer value the client is expected to send during the exchange.
pub fn expected_exchange_bearer(token: &str) -> String {
    format!("Bearer {}", B64.encode(Sha256::digest(token.as_bytes())))
}

/// Bearer value the client is expected to send on machine resource fetches.
pub fn expected_resource_bearer(token: &str) -> String {
    format!("Bearer {}", B64.encode(token.as_bytes()))
}

/// How the cacerts endpoint should compute its hash header.
#[derive(Clone, Copy)]
pub enum HashMode {
    /// Correct keyed hash over the request nonce
    Valid,
    /// Hash computed over a stale nonce
    WrongNonce,
    /// No hash header at all
    Missing,
}

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub nonce: Option<String>,
    pub authorization: Option<String>,
}

/// Behavior knobs for a [`TlsServer`].
pub struct ServerOptions {
    pub token: String,
    pub cacerts_status: u16,
    /// Body served from the cacerts endpoints; `None` serves this
    /// server's own CA PEM.
    pub cacerts_body: Option<Vec<u8>>,
    pub hash_mode: HashMode,
    pub resource_status: u16,
    pub resource_body: Vec<u8>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            token: "tok".to_string(),
            cacerts_status: 200,
            cacerts_body: None,
            hash_mode: HashMode::Valid,
            resource_status: 200,
            resource_body: b"resource".to_vec(),
        }
    }
}

/// HTTPS server whose certificate chains to a CA the default trust store
/// has never heard of.
pub struct TlsServer {
    addr: SocketAddr,
    pub ca_pem: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl TlsServer {
    pub async fn spawn(options: ServerOptions) -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::default();
        ca_params.distinguished_name = DistinguishedName::new();
        ca_params
            .distinguished_name
            .push(DnType::CommonName, "drover test ca");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();
        let ca_pem = ca_cert.pem();

        let leaf_key = KeyPair::generate().unwrap();
        let mut leaf_params = CertificateParams::default();
        leaf_params.distinguished_name = DistinguishedName::new();
        leaf_params
            .distinguished_name
            .push(DnType::CommonName, "127.0.0.1");
        leaf_params
            .subject_alt_names
            .push(SanType::DnsName("localhost".to_string().try_into().unwrap()));
        leaf_params
            .subject_alt_names
            .push(SanType::IpAddress("127.0.0.1".parse().unwrap()));
        let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(
                vec![leaf_cert.der().clone()],
                PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
            )
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let state = Arc::new((options, ca_pem.clone(), requests.clone()));
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let acceptor = acceptor.clone();
                let state = state.clone();
                tokio::spawn(async move {
                    // A verifying probe aborts the handshake; that is
                    // expected traffic, not a harness failure.
                    if let Ok(tls) = acceptor.accept(stream).await {
                        serve_connection(tls, &state).await;
                    }
                });
            }
        });

        Self { addr, ca_pem, requests }
    }

    pub fn uri(&self) -> String {
        format!("https://127.0.0.1:{}", self.addr.port())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_to(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().find(|r| r.path == path)
    }
}

async fn serve_connection(
    mut tls: tokio_rustls::server::TlsStream<tokio::net::TcpStream>,
    state: &(ServerOptions, String, Arc<Mutex<Vec<Recorded>>>),
) {
    let (options, ca_pem, requests) = state;

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match tls.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.lines();
    let request_line = lines.next().unwrap_or_default();
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut nonce = None;
    let mut authorization = None;
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            match name.to_ascii_lowercase().as_str() {
                "x-cattle-nonce" => nonce = Some(value),
                "authorization" => authorization = Some(value),
                _ => {}
            }
        }
    }

    requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        nonce: nonce.clone(),
        authorization,
    });

    let is_cacerts = path == "/cacerts" || path == "/v1-rancheros/cacerts";
    let (status, body, hash_header) = if is_cacerts {
        let body = options
            .cacerts_body
            .clone()
            .unwrap_or_else(|| ca_pem.as_bytes().to_vec());
        let hash = match options.hash_mode {
            HashMode::Valid => Some(wire_hash(
                &options.token,
                nonce.as_deref().unwrap_or(""),
                &body,
            )),
            HashMode::WrongNonce => Some(wire_hash(&options.token, "stale-nonce", &body)),
            HashMode::Missing => None,
        };
        (options.cacerts_status, body, hash)
    } else {
        (options.resource_status, options.resource_body.clone(), None)
    };

    let reason = if status == 200 { "OK" } else { "Error" };
    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    if let Some(hash) = hash_header {
        response.push_str(&format!("x-cattle-hash: {hash}\r\n"));
    }
    response.push_str("\r\n");

    let _ = tls.write_all(response.as_bytes()).await;
    let _ = tls.write_all(&body).await;
    let _ = tls.shutdown().await;
}
