//! Trust-on-first-use bootstrap client for cluster management servers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use drover::{DroverClient, TokenScope};
//!
//! #[tokio::main]
//! async fn main() -> drover::Result<()> {
//!     let client = DroverClient::new("https://server.example:8443", "join-token")?;
//!
//!     // Establish trust and report what was pinned
//!     let bundle = client.ca_certs(TokenScope::Cluster).await?;
//!     match bundle.checksum() {
//!         Some(checksum) => println!("pinned CA bundle {checksum}"),
//!         None => println!("system trust store suffices"),
//!     }
//!
//!     // Fetch a protected resource over the verified trust root
//!     let fetched = client.get("/v1/settings").await?;
//!     println!("{} bytes", fetched.body.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/drover/0.1.0")]

// Re-export core types
pub use drover_core::*;

// Re-export client
pub use drover_client::{
    hash, plan, Bootstrapper, DroverClient, DroverClientBuilder, PassthroughResolver,
    ResolvedToken, TokenResolver,
};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
