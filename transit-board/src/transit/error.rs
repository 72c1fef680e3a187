//! Transit query error types.

use crate::domain::InvalidSearchTerm;

/// Errors surfaced by [`TransitQuery`](super::TransitQuery) implementations.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// Input rejected before any request was made
    #[error(transparent)]
    Validation(#[from] InvalidSearchTerm),

    /// The proxy could not be reached or the request could not be sent
    #[error("could not reach the transit proxy: {0}")]
    Transport(#[source] reqwest::Error),

    /// The proxy answered with a non-2xx status
    #[error("request failed: {status} {status_text}{}", details(.message, .detail))]
    Upstream {
        status: u16,
        status_text: String,
        message: Option<String>,
        detail: Option<String>,
    },

    /// The provider reported GraphQL errors
    #[error("GraphQL query errors: {} ({status})", .messages.join(", "))]
    Graphql { status: u16, messages: Vec<String> },

    /// A successful response whose body could not be parsed
    #[error("invalid response from the transit proxy: {message}")]
    Decode { message: String },
}

impl TransitError {
    /// Whether this error happened before reaching the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, TransitError::Validation(_))
    }
}

/// `". message: detail"`, skipping whatever is missing.
fn details(message: &Option<String>, detail: &Option<String>) -> String {
    let parts: Vec<&str> = [message, detail]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(". {}", parts.join(": "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchTerm;

    #[test]
    fn upstream_message_concatenates_body_fields() {
        let err = TransitError::Upstream {
            status: 500,
            status_text: "Internal Server Error".into(),
            message: Some("Error fetching data from Digitransit".into()),
            detail: Some("GraphQL API request failed: 502 Bad Gateway. Details: down".into()),
        };
        assert_eq!(
            err.to_string(),
            "request failed: 500 Internal Server Error. Error fetching data from Digitransit: \
             GraphQL API request failed: 502 Bad Gateway. Details: down"
        );
    }

    #[test]
    fn upstream_message_without_body() {
        let err = TransitError::Upstream {
            status: 404,
            status_text: "Not Found".into(),
            message: None,
            detail: None,
        };
        assert_eq!(err.to_string(), "request failed: 404 Not Found");
    }

    #[test]
    fn graphql_message_lists_errors() {
        let err = TransitError::Graphql {
            status: 500,
            messages: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "GraphQL query errors: a, b (500)");
    }

    #[test]
    fn validation_wraps_search_term_error() {
        let err: TransitError = SearchTerm::parse("ab").unwrap_err().into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "search term must be at least 3 characters, got 2");
    }
}
