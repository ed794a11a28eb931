//! Trust-on-first-use client for cluster management servers.
//!
//! This crate provides the [`Bootstrapper`], which retrieves and verifies a
//! server's CA bundle using only a shared join token, and the
//! [`DroverClient`], which fetches protected resources over a connection
//! pinned to the verified bundle.

#![doc(html_root_url = "https://docs.rs/drover-client/0.1.0")]

mod bootstrap;
mod client;
pub mod hash;
pub mod plan;
mod token;

pub use bootstrap::Bootstrapper;
pub use client::{DroverClient, DroverClientBuilder};
pub use drover_core::{DroverError, Result};
pub use token::{PassthroughResolver, ResolvedToken, TokenResolver};
