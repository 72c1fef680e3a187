//! Digitransit GraphQL HTTP client.
//!
//! Sends the two queries the board needs (stop search and stop departures)
//! to the routing API, authenticating with a subscription key header.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::domain::{StopDetails, StopSearchItem, VehicleMode};

use super::error::DigitransitError;
use super::types::{GraphqlRequest, GraphqlResponse, StopData, StopsData, error_details};

/// Default endpoint: HSL routing API v2.
pub const DEFAULT_BASE_URL: &str = "https://api.digitransit.fi/routing/v2/hsl/gtfs/v1";

/// Header carrying the subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "digitransit-subscription-key";

/// Default number of departures fetched per stop.
const DEFAULT_DEPARTURES_LIMIT: u32 = 20;

const SEARCH_STOPS_QUERY: &str = r#"
query SearchStops($name: String!) {
  stops(name: $name) {
    gtfsId
    name
    code
    vehicleMode
  }
}
"#;

const STOP_DEPARTURES_QUERY: &str = r#"
query GetStopDepartures($stopId: String!, $numberOfDepartures: Int!) {
  stop(id: $stopId) {
    gtfsId
    name
    code
    vehicleMode
    stoptimesWithoutPatterns(numberOfDepartures: $numberOfDepartures, omitNonPickups: true) {
      scheduledArrival
      realtimeArrival
      arrivalDelay
      scheduledDeparture
      realtimeDeparture
      departureDelay
      realtime
      realtimeState
      serviceDay
      headsign
      trip {
        routeShortName
        gtfsId
      }
    }
  }
}
"#;

/// Configuration for the Digitransit client.
#[derive(Debug, Clone)]
pub struct DigitransitConfig {
    /// Subscription key; requests are refused locally without one
    pub api_key: Option<String>,
    /// GraphQL endpoint URL
    pub base_url: String,
    /// Departures requested per stop
    pub departures_limit: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DigitransitConfig {
    /// Create a new config. An empty key counts as no key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            departures_limit: DEFAULT_DEPARTURES_LIMIT,
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of departures fetched per stop.
    pub fn with_departures_limit(mut self, n: u32) -> Self {
        self.departures_limit = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Digitransit routing API client.
#[derive(Debug, Clone)]
pub struct DigitransitClient {
    http: reqwest::Client,
    base_url: String,
    configured: bool,
    departures_limit: u32,
}

impl DigitransitClient {
    /// Create a new client with the given configuration.
    ///
    /// A missing key is not an error here: the client is still built, but
    /// every query fails with [`DigitransitError::NotConfigured`].
    pub fn new(config: DigitransitConfig) -> Result<Self, DigitransitError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value =
                HeaderValue::from_str(key).map_err(|_| DigitransitError::InvalidApiKey)?;
            headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            configured: config.api_key.is_some(),
            departures_limit: config.departures_limit,
        })
    }

    /// Whether a subscription key is available.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Search stops by name.
    ///
    /// When `modes` is non-empty only stops served by one of those modes are
    /// returned; an empty slice means every mode.
    pub async fn search_stops(
        &self,
        name: &str,
        modes: &[VehicleMode],
    ) -> Result<Vec<StopSearchItem>, DigitransitError> {
        let data: StopsData = self
            .query(SEARCH_STOPS_QUERY, json!({ "name": name }))
            .await?;
        let stops = data.stops.unwrap_or_default();
        debug!(name, found = stops.len(), "stop search");
        Ok(retain_modes(stops, modes))
    }

    /// Fetch a stop and its upcoming departures.
    ///
    /// Returns `Ok(None)` when the provider knows no stop with this id.
    pub async fn stop_departures(
        &self,
        stop_id: &str,
    ) -> Result<Option<StopDetails>, DigitransitError> {
        let data: StopData = self
            .query(
                STOP_DEPARTURES_QUERY,
                json!({ "stopId": stop_id, "numberOfDepartures": self.departures_limit }),
            )
            .await?;
        debug!(
            stop_id,
            departures = data.stop.as_ref().map(|s| s.departures.len()),
            "stop departures"
        );
        Ok(data.stop)
    }

    /// POST a GraphQL query and unwrap its `data`.
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, DigitransitError> {
        if !self.configured {
            return Err(DigitransitError::NotConfigured);
        }

        let response = self
            .http
            .post(&self.base_url)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "GraphQL API error response");
            return Err(DigitransitError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                details: error_details(&body),
            });
        }

        let body = response.text().await?;

        let parsed: GraphqlResponse<T> =
            serde_json::from_str(&body).map_err(|e| DigitransitError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            error!(?messages, "GraphQL errors");
            return Err(DigitransitError::Graphql(messages));
        }

        parsed.data.ok_or(DigitransitError::MissingData)
    }
}

/// Keep only stops served by one of `modes`; an empty slice keeps all.
fn retain_modes(stops: Vec<StopSearchItem>, modes: &[VehicleMode]) -> Vec<StopSearchItem> {
    if modes.is_empty() {
        return stops;
    }
    stops
        .into_iter()
        .filter(|s| s.vehicle_mode.as_ref().is_some_and(|m| modes.contains(m)))
        .collect()
}
