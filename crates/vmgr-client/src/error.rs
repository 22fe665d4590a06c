//! Error types for the vmgr client

use thiserror::Error;

/// Errors that can occur when talking to the management API
#[derive(Error, Debug)]
pub enum ClientError {
    /// The requested object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Base URL cannot carry path segments (e.g. `mailto:`)
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// API returned an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Check if the error reports a missing object
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable() {
        assert!(ClientError::NotFound("disk x".into()).is_not_found());
        assert!(!ClientError::Timeout.is_not_found());
        assert!(
            !ClientError::Api {
                status: 500,
                message: "not found".into(),
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_display() {
        let err = ClientError::Api {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.to_string(), "API error (503): busy");
        assert_eq!(
            ClientError::NotFound("object abc".into()).to_string(),
            "not found: object abc"
        );
    }
}
