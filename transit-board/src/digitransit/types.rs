//! Digitransit GraphQL request and response DTOs.
//!
//! Payload shapes (stops, departures) reuse the domain types directly; only
//! the GraphQL envelope lives here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{StopDetails, StopSearchItem};

/// Body of a GraphQL POST.
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// Error-ish fields Digitransit may put in a non-2xx body.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of the stop search query.
#[derive(Debug, Deserialize)]
pub struct StopsData {
    #[serde(default)]
    pub stops: Option<Vec<StopSearchItem>>,
}

/// `data` of the stop departures query.
#[derive(Debug, Deserialize)]
pub struct StopData {
    #[serde(default)]
    pub stop: Option<StopDetails>,
}

/// Human-readable details for a failed response body.
///
/// Prefers the GraphQL error messages, then a top-level `message`, and
/// falls back to the raw text.
pub fn error_details(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.to_string();
    };
    match (parsed.errors, parsed.message) {
        (Some(errors), _) if !errors.is_empty() => errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join(", "),
        (_, Some(message)) => message,
        _ => body.to_string(),
    }
}
