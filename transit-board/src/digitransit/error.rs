//! Digitransit client error types.

use std::fmt;

/// Errors from the Digitransit GraphQL client.
#[derive(Debug)]
pub enum DigitransitError {
    /// No subscription key was configured, so no request was attempted.
    NotConfigured,

    /// The configured key cannot be sent as a header value.
    InvalidApiKey,

    /// HTTP request failed (connection refused, timeout, etc.)
    Http(reqwest::Error),

    /// API returned a non-success status code
    Status {
        status: u16,
        status_text: String,
        details: String,
    },

    /// API answered with a GraphQL error list
    Graphql(Vec<String>),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response had neither `data` nor `errors`
    MissingData,
}

impl DigitransitError {
    /// GraphQL error messages carried by this error, if any.
    pub fn graphql_messages(&self) -> &[String] {
        match self {
            DigitransitError::Graphql(messages) => messages,
            _ => &[],
        }
    }
}

impl fmt::Display for DigitransitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitransitError::NotConfigured => {
                write!(f, "HSL_API_KEY is not configured; cannot query Digitransit")
            }
            DigitransitError::InvalidApiKey => write!(f, "invalid API key format"),
            DigitransitError::Http(e) => write!(f, "HTTP error: {e}"),
            DigitransitError::Status {
                status,
                status_text,
                details,
            } => write!(
                f,
                "GraphQL API request failed: {status} {status_text}. Details: {details}"
            ),
            DigitransitError::Graphql(messages) => {
                write!(f, "GraphQL query errors: {}", messages.join(", "))
            }
            DigitransitError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DigitransitError::MissingData => write!(f, "GraphQL response contained no data"),
        }
    }
}

impl std::error::Error for DigitransitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DigitransitError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DigitransitError {
    fn from(err: reqwest::Error) -> Self {
        DigitransitError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DigitransitError::Status {
            status: 502,
            status_text: "Bad Gateway".into(),
            details: "upstream timeout".into(),
        };
        assert_eq!(
            err.to_string(),
            "GraphQL API request failed: 502 Bad Gateway. Details: upstream timeout"
        );

        let err = DigitransitError::Graphql(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "GraphQL query errors: a, b");
        assert_eq!(err.graphql_messages(), ["a", "b"]);

        let err = DigitransitError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));

        assert!(DigitransitError::NotConfigured.graphql_messages().is_empty());
    }
}
