//! HTTP proxy in front of the Digitransit API.
//!
//! Clients post a `{type, payload}` envelope to [`PROXY_PATH`]; the proxy
//! validates it, runs the matching GraphQL query with the server's API key
//! and returns the bare result. Failures come back as [`ErrorResponse`]
//! bodies with status 400 (malformed request) or 500 (upstream failure or
//! missing key).

mod dto;
mod routes;
mod state;


pub use dto::{EnvelopeError, ErrorResponse, ProxyRequest};
pub use routes::{AppError, PROXY_PATH, create_router};
pub use state::AppState;
