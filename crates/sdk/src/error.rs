//! Error types for the Eka SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type EkaResult<T> = Result<T, EkaError>;

/// Error types that can occur when talking to the Eka API.
#[derive(Debug, thiserror::Error)]
pub enum EkaError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Credentials were rejected by the API.
    #[error("unauthorized (status {status}): {message}; re-check --client-id/--client-secret")]
    Unauthorized { status: u16, message: String },

    /// Requested resource is absent from the corpus.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl EkaError {
    /// Whether the caller may reasonably try the same request again.
    ///
    /// Transport failures, timeouts, and 5xx responses are transient;
    /// everything else reflects the request itself and will not improve
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Map a non-success status code and response body to an error.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, details) = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => (parsed.error, parsed.details),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 | 403 => Self::Unauthorized { status, message },
            404 => Self::NotFound(message),
            _ => Self::Api {
                status,
                message,
                details,
            },
        }
    }
}

/// Error body shape returned by the Eka API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        let err = EkaError::from_response(401, r#"{"error": "invalid client secret"}"#);
        match err {
            EkaError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid client secret");
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
        assert!(!EkaError::from_response(403, "forbidden").is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        assert!(EkaError::from_response(502, "bad gateway").is_retryable());
        assert!(EkaError::from_response(500, "oops").is_retryable());
        assert!(!EkaError::from_response(400, "bad request").is_retryable());
        assert!(!EkaError::from_response(404, "missing").is_retryable());
        assert!(EkaError::Timeout.is_retryable());
    }

    #[test]
    fn unparseable_body_falls_back_to_raw_text() {
        let err = EkaError::from_response(500, "upstream exploded");
        match err {
            EkaError::Api { message, details, .. } => {
                assert_eq!(message, "upstream exploded");
                assert!(details.is_none());
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
