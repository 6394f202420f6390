//! # Error Types
//!
//! Errors surfaced by [`CuckooClient`](crate::CuckooClient) operations.

use shared_fabric::FabricError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors from invoking Cuckoo remote commands.
#[derive(Debug, Error)]
pub enum CuckooError {
    /// An argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The Cuckoo service answered with an error response.
    #[error("Error: {message} ({code})")]
    RemoteService { code: i32, message: String },

    /// The fabric failed to deliver the request or its response.
    #[error(transparent)]
    Transport(#[from] FabricError),

    /// The request payload could not be encoded as JSON.
    #[error("Failed to encode request payload: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The response payload is not valid UTF-8.
    #[error("Response payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ConfigError> for CuckooError {
    fn from(err: ConfigError) -> Self {
        CuckooError::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_remote_service_display() {
        let err = CuckooError::RemoteService {
            code: 5,
            message: "bad command".into(),
        };
        assert_eq!(err.to_string(), "Error: bad command (5)");
    }

    #[test]
    fn test_transport_display_is_transparent() {
        let inner = FabricError::Timeout {
            topic: "/svc".into(),
            timeout: Duration::from_secs(1),
        };
        let err = CuckooError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
