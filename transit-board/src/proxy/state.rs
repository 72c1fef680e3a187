//! Application state for the proxy.

use std::sync::Arc;

use crate::digitransit::DigitransitClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream GraphQL client; holds the API key
    pub digitransit: Arc<DigitransitClient>,
}

impl AppState {
    pub fn new(digitransit: DigitransitClient) -> Self {
        Self {
            digitransit: Arc::new(digitransit),
        }
    }
}
