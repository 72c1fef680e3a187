//! Client side of the transit proxy.
//!
//! [`TransitClient`] sends stop searches and departure lookups to the proxy
//! and classifies its failures into [`TransitError`].

mod client;
mod error;

pub use client::{DEFAULT_PROXY_URL, TransitClient, TransitConfig, TransitQuery};
pub use error::TransitError;
