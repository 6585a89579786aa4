//! Error types for the ByteBucket client.
//!
//! The navigation tracker never fails; everything here belongs to the storage API
//! client, the session's mutations, configuration and logging setup.

use thiserror::Error;

/// Errors surfaced to the rendering layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or protocol failure before a response was received
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {message}")]
    StatusError { status: u16, message: String },

    /// Response body did not match any known shape
    #[error("Malformed response: {0}")]
    DecodeError(String),

    /// Rejected on the client before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    /// Whether repeating the same idempotent request could succeed.
    ///
    /// Transport failures, 5xx and 429 are retryable; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::TransportError(_) => true,
            ApiError::StatusError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::StatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::StatusError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::TransportError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DecodeError(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::TransportError("refused".into()).is_retryable());
        assert!(ApiError::StatusError {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(ApiError::StatusError {
            status: 429,
            message: "slow down".into()
        }
        .is_retryable());
        assert!(!ApiError::StatusError {
            status: 404,
            message: "missing".into()
        }
        .is_retryable());
        assert!(!ApiError::DecodeError("bad".into()).is_retryable());
        assert!(!ApiError::InvalidInput("empty".into()).is_retryable());
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::StatusError {
            status: 400,
            message: "Folder name can't be empty".into(),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Server returned 400: Folder name can't be empty"
        );
    }
}
