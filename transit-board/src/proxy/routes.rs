//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::digitransit::DigitransitError;

use super::dto::{EnvelopeError, ErrorResponse, ProxyRequest};
use super::state::AppState;

/// Path of the proxy endpoint.
pub const PROXY_PATH: &str = "/api/digitransit";

/// Create the proxy router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(PROXY_PATH, post(digitransit).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method Not Allowed")),
    )
        .into_response()
}

/// Forward one request envelope to Digitransit.
async fn digitransit(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    if !state.digitransit.is_configured() {
        return Err(AppError::NotConfigured);
    }

    let envelope: Value = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })?;
    let request = ProxyRequest::from_envelope(&envelope)?;

    match request {
        ProxyRequest::SearchStops { name, modes } => {
            info!(%name, ?modes, "searchStops");
            let stops = state.digitransit.search_stops(&name, &modes).await?;
            Ok(Json(stops).into_response())
        }
        ProxyRequest::GetDepartures { stop_id } => {
            info!(%stop_id, "getDepartures");
            let stop = state.digitransit.stop_departures(&stop_id).await?;
            Ok(Json(stop).into_response())
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The server has no Digitransit API key
    NotConfigured,
    BadRequest { message: String },
    Upstream(DigitransitError),
}

impl From<EnvelopeError> for AppError {
    fn from(e: EnvelopeError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DigitransitError> for AppError {
    fn from(e: DigitransitError) -> Self {
        match e {
            DigitransitError::NotConfigured => AppError::NotConfigured,
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotConfigured => {
                error!("request refused: HSL_API_KEY is not set");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("API key not configured on the server."),
                )
            }
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            AppError::Upstream(e) => {
                error!(error = %e, "Digitransit request failed");
                let messages = e.graphql_messages();
                let body = ErrorResponse {
                    message: "Error fetching data from Digitransit".to_string(),
                    error: Some(e.to_string()),
                    errors: (!messages.is_empty()).then(|| messages.to_vec()),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_errors_are_bad_requests() {
        let response = AppError::from(EnvelopeError::UnknownType).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_key_is_a_server_error() {
        let response = AppError::from(DigitransitError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_failures_are_server_errors() {
        let response = AppError::from(DigitransitError::MissingData).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
