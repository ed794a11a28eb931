//! # drover-cli
//!
//! Command-line interface for bootstrapping trust with a cluster
//! management server.
//!
//! ## Commands
//!
//! - **cacerts**: retrieve and verify the server's CA bundle
//! - **get**: fetch a protected resource over the pinned trust root
//! - **plan**: emit provisioning descriptors for installing the bundle

pub mod cli;

pub use cli::run;
