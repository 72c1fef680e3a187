//! Digitransit routing API client.
//!
//! The proxy's only upstream. Digitransit exposes a single GraphQL endpoint;
//! every request is a POST of `{query, variables}` authenticated with the
//! `digitransit-subscription-key` header.
//!
//! A GraphQL response can carry an `errors` list alongside HTTP 200; such
//! responses are treated as failures.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, DigitransitClient, DigitransitConfig};
pub use error::DigitransitError;
