//! HTTP client for the transit proxy.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{GtfsId, SearchTerm, StopDetails, StopSearchItem, VehicleMode};
use crate::proxy::{ErrorResponse, ProxyRequest};

use super::error::TransitError;

/// Where the proxy listens by default.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000/api/digitransit";

/// Stop search and departure lookups.
///
/// This abstraction allows the session to be tested without a network.
pub trait TransitQuery {
    /// Search stops by name, keeping only the given modes (empty means all).
    fn search_stops(
        &self,
        term: &SearchTerm,
        modes: &[VehicleMode],
    ) -> impl Future<Output = Result<Vec<StopSearchItem>, TransitError>> + Send;

    /// Fetch a stop's upcoming departures; `None` if no such stop exists.
    fn get_stop_departures(
        &self,
        stop_id: &GtfsId,
    ) -> impl Future<Output = Result<Option<StopDetails>, TransitError>> + Send;
}

/// Configuration for the proxy client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Full URL of the proxy endpoint
    pub proxy_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL)
    }
}

/// Talks to the proxy; never sees the upstream API key.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    proxy_url: String,
}

impl TransitClient {
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TransitError::Transport)?;

        Ok(Self {
            http,
            proxy_url: config.proxy_url,
        })
    }

    /// POST one envelope and decode the reply.
    async fn send<T: DeserializeOwned>(&self, request: &ProxyRequest) -> Result<T, TransitError> {
        let response = self
            .http
            .post(&self.proxy_url)
            .json(request)
            .send()
            .await
            .map_err(TransitError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(TransitError::Transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), %body, "proxy error response");
            return Err(classify_failure(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| TransitError::Decode {
            message: e.to_string(),
        })
    }
}

impl TransitQuery for TransitClient {
    async fn search_stops(
        &self,
        term: &SearchTerm,
        modes: &[VehicleMode],
    ) -> Result<Vec<StopSearchItem>, TransitError> {
        let stops: Vec<StopSearchItem> = self
            .send(&ProxyRequest::search_stops(term.as_str(), modes))
            .await?;
        debug!(term = term.as_str(), found = stops.len(), "searched stops");
        Ok(stops)
    }

    async fn get_stop_departures(
        &self,
        stop_id: &GtfsId,
    ) -> Result<Option<StopDetails>, TransitError> {
        self.send(&ProxyRequest::get_departures(stop_id)).await
    }
}

/// Turn a non-2xx reply into an error, using its body when it is ours.
fn classify_failure(status: u16, status_text: &str, body: &str) -> TransitError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();

    match parsed {
        Some(ErrorResponse {
            errors: Some(messages),
            ..
        }) if !messages.is_empty() => TransitError::Graphql { status, messages },
        Some(ErrorResponse { message, error, .. }) => TransitError::Upstream {
            status,
            status_text: status_text.to_string(),
            message: Some(message),
            detail: error,
        },
        None => TransitError::Upstream {
            status,
            status_text: status_text.to_string(),
            message: None,
            detail: Some(body.to_string()).filter(|b| !b.trim().is_empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TransitConfig::default();
        assert_eq!(config.proxy_url, DEFAULT_PROXY_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(TransitConfig::new("http://x").with_timeout(5).timeout_secs, 5);
    }

    #[test]
    fn classify_graphql_error_list() {
        let body = r#"{"message": "Error fetching data from Digitransit", "error": "GraphQL query errors: bad", "errors": ["bad"]}"#;
        match classify_failure(500, "Internal Server Error", body) {
            TransitError::Graphql { status, messages } => {
                assert_eq!(status, 500);
                assert_eq!(messages, ["bad"]);
            }
            other => panic!("expected Graphql, got {other:?}"),
        }
    }

    #[test]
    fn classify_structured_error() {
        let body = r#"{"message": "Invalid request type"}"#;
        match classify_failure(400, "Bad Request", body) {
            TransitError::Upstream {
                status,
                message,
                detail,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Invalid request type"));
                assert_eq!(detail, None);
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn classify_unstructured_error() {
        let err = classify_failure(502, "Bad Gateway", "upstream connect error");
        assert_eq!(err.to_string(), "request failed: 502 Bad Gateway. upstream connect error");

        let err = classify_failure(502, "Bad Gateway", "");
        assert_eq!(err.to_string(), "request failed: 502 Bad Gateway");
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_transport_error() {
        // Bind then drop a listener to get a port nobody is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TransitClient::new(TransitConfig::new(format!("http://{addr}/api/digitransit")))
            .unwrap();
        let result = client
            .get_stop_departures(&GtfsId::parse("HSL:1").unwrap())
            .await;
        assert!(matches!(result, Err(TransitError::Transport(_))));
    }
}
