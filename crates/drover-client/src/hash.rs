//! Digest, MAC, and nonce helpers for the bootstrap wire protocol.
//!
//! Exported so that server implementations and tests can compute the exact
//! values the client expects on the wire.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use ring::digest::{digest, SHA256};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};

use drover_core::{DroverError, Result};

/// Nonce length in raw bytes, before hex encoding
const NONCE_LEN: usize = 32;

/// Compute SHA-256 of raw bytes, lowercase hex-encoded.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}

/// Compute SHA-256 of raw bytes, base64-encoded.
#[must_use]
pub fn sha256_base64(data: &[u8]) -> String {
    B64.encode(digest(&SHA256, data).as_ref())
}

/// Bearer value for the bootstrap exchange.
///
/// The raw token never goes on the wire during bootstrap; only its digest
/// does.
#[must_use]
pub fn token_digest(token: &str) -> String {
    sha256_base64(token.as_bytes())
}

/// Generate a fresh nonce from the system CSPRNG, hex-encoded.
pub fn nonce() -> Result<String> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; NONCE_LEN];
    rng.fill(&mut buf).map_err(|_| DroverError::Nonce)?;
    Ok(hex::encode(buf))
}

/// Keyed integrity hash over a bootstrap response:
/// `base64(HMAC-SHA512(key = token, nonce || 0x00 || body || 0x00))`.
///
/// The separator bytes keep nonce and body from sliding into each other
/// under concatenation.
#[must_use]
pub fn response_hash(token: &str, nonce: &str, body: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA512, token.as_bytes());
    let mut ctx = hmac::Context::with_key(&key);
    ctx.update(nonce.as_bytes());
    ctx.update(&[0]);
    ctx.update(body);
    ctx.update(&[0]);
    B64.encode(ctx.sign().as_ref())
}
