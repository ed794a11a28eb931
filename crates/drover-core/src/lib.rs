//! Core types for the drover trust-bootstrap client.
//!
//! This crate provides the foundational pieces shared across the drover
//! workspace:
//!
//! - **Types**: [`CaBundle`], [`Fetched`], [`TokenScope`] and the
//!   provisioning descriptors handed to the execution agent
//! - **Errors**: the [`DroverError`] taxonomy with a [`Result`] alias
//!
//! # Example
//!
//! ```rust,ignore
//! use drover_core::{CaBundle, Result};
//!
//! fn report(bundle: &CaBundle) -> Result<()> {
//!     match bundle.checksum() {
//!         Some(checksum) => println!("pinned CA bundle {checksum}"),
//!         None => println!("system trust store suffices"),
//!     }
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/drover-core/0.1.0")]

mod error;
pub mod types;

pub use error::{DroverError, Result};
pub use types::*;
