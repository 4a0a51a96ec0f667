//! Backend client error types.

use campus_core::QuizError;
use thiserror::Error;

/// Errors that can occur when talking to the recommendation backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The domain has no endpoint for this operation.
    #[error("domain '{domain}' has no endpoint for {operation}")]
    Unsupported { domain: String, operation: String },
}

impl From<ClientError> for QuizError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Parse(message) => Self::MalformedResponse(message),
            ClientError::Unsupported { domain, operation } => {
                Self::ActionUnsupported { domain, operation }
            }
            other => Self::Network(other.to_string()),
        }
    }
}
