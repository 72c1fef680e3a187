//! Wire types for the proxy endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{GtfsId, VehicleMode};

/// A request to the proxy, serialized as `{"type": ..., "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ProxyRequest {
    /// Search stops by name.
    SearchStops {
        name: String,
        /// Modes to keep; empty means every mode
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modes: Vec<VehicleMode>,
    },
    /// Fetch a stop with its upcoming departures.
    GetDepartures {
        #[serde(rename = "stopId")]
        stop_id: String,
    },
}

impl ProxyRequest {
    pub fn search_stops(name: &str, modes: &[VehicleMode]) -> Self {
        Self::SearchStops {
            name: name.to_string(),
            modes: modes.to_vec(),
        }
    }

    pub fn get_departures(stop_id: &GtfsId) -> Self {
        Self::GetDepartures {
            stop_id: stop_id.as_str().to_string(),
        }
    }

    /// Parse a request envelope, reporting which part of it is malformed.
    ///
    /// Parsing is done by hand rather than through `Deserialize` so that a
    /// bad payload for a known type is told apart from an unknown type.
    pub fn from_envelope(envelope: &Value) -> Result<Self, EnvelopeError> {
        let payload = envelope.get("payload").filter(|p| p.is_object());

        match envelope.get("type").and_then(Value::as_str) {
            Some("searchStops") => {
                let payload = payload.ok_or(EnvelopeError::SearchStopsPayload)?;
                let name = payload
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or(EnvelopeError::SearchStopsPayload)?;
                let modes = match payload.get("modes") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(modes) => Vec::<VehicleMode>::deserialize(modes)
                        .map_err(|_| EnvelopeError::SearchStopsPayload)?,
                };
                Ok(Self::SearchStops {
                    name: name.to_string(),
                    modes,
                })
            }
            Some("getDepartures") => {
                let stop_id = payload
                    .and_then(|p| p.get("stopId"))
                    .and_then(Value::as_str)
                    .ok_or(EnvelopeError::GetDeparturesPayload)?;
                Ok(Self::GetDepartures {
                    stop_id: stop_id.to_string(),
                })
            }
            _ => Err(EnvelopeError::UnknownType),
        }
    }
}

/// Why a request envelope was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Invalid payload for searchStops")]
    SearchStopsPayload,
    #[error("Invalid payload for getDepartures")]
    GetDeparturesPayload,
    #[error("Invalid request type")]
    UnknownType,
}

/// Body of every error response from the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,

    /// Underlying failure, for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// GraphQL error messages reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_search_request() {
        let request = ProxyRequest::search_stops("Kamppi", &[VehicleMode::Bus]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "searchStops", "payload": {"name": "Kamppi", "modes": ["BUS"]}})
        );
    }

    #[test]
    fn serialize_search_request_without_modes() {
        let request = ProxyRequest::search_stops("Kamppi", &[]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "searchStops", "payload": {"name": "Kamppi"}})
        );
    }

    #[test]
    fn serialize_departures_request() {
        let request = ProxyRequest::get_departures(&GtfsId::parse("HSL:1040129").unwrap());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "getDepartures", "payload": {"stopId": "HSL:1040129"}})
        );
    }

    #[test]
    fn envelope_accepts_what_the_client_sends() {
        let request = ProxyRequest::search_stops("Kamppi", &[VehicleMode::Tram, VehicleMode::Subway]);
        let envelope = serde_json::to_value(&request).unwrap();
        assert_eq!(ProxyRequest::from_envelope(&envelope), Ok(request));
    }

    #[test]
    fn envelope_modes_are_optional() {
        let envelope = json!({"type": "searchStops", "payload": {"name": "Kamppi", "modes": null}});
        assert_eq!(
            ProxyRequest::from_envelope(&envelope),
            Ok(ProxyRequest::search_stops("Kamppi", &[]))
        );
    }

    #[test]
    fn envelope_keeps_unrecognized_modes() {
        let envelope = json!({"type": "searchStops", "payload": {"name": "Kamppi", "modes": ["FUNICULAR"]}});
        assert_eq!(
            ProxyRequest::from_envelope(&envelope),
            Ok(ProxyRequest::search_stops("Kamppi", &[VehicleMode::Unknown("FUNICULAR".into())]))
        );
    }

    #[test]
    fn envelope_rejects_bad_search_payload() {
        for envelope in [
            json!({"type": "searchStops"}),
            json!({"type": "searchStops", "payload": null}),
            json!({"type": "searchStops", "payload": {"name": 3}}),
            json!({"type": "searchStops", "payload": {"name": "Kamppi", "modes": [1]}}),
        ] {
            assert_eq!(
                ProxyRequest::from_envelope(&envelope),
                Err(EnvelopeError::SearchStopsPayload),
                "{envelope}"
            );
        }
    }

    #[test]
    fn envelope_rejects_bad_departures_payload() {
        for envelope in [
            json!({"type": "getDepartures", "payload": {}}),
            json!({"type": "getDepartures", "payload": {"stopId": null}}),
            json!({"type": "getDepartures", "payload": "HSL:1"}),
        ] {
            assert_eq!(
                ProxyRequest::from_envelope(&envelope),
                Err(EnvelopeError::GetDeparturesPayload),
                "{envelope}"
            );
        }
    }

    #[test]
    fn envelope_rejects_unknown_type() {
        for envelope in [json!({"type": "deleteStop"}), json!({}), json!([1, 2]), json!({"type": 1})] {
            assert_eq!(
                ProxyRequest::from_envelope(&envelope),
                Err(EnvelopeError::UnknownType)
            );
        }
    }

    #[test]
    fn error_response_omits_empty_fields() {
        let body = ErrorResponse::new("Method Not Allowed");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"message": "Method Not Allowed"})
        );
    }
}
