//! Fetch error types.

use s3reader_core::{AddressError, ClientError};
use thiserror::Error;

/// Message used when retries run out without a captured error.
pub const UNKNOWN_EXHAUSTION: &str = "Unknown error occurred. Failed to download the file.";

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for materializing a remote address.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Malformed or unroutable address.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Non-transient object-store client failure.
    #[error("Object store error: {0}")]
    Client(#[from] ClientError),

    /// Every attempt failed with a transient error.
    #[error("{}", exhausted_message(.attempts, .last))]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last transient error, if any attempt ran.
        last: Option<Box<ClientError>>,
    },

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP response.
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// Local IO failure (temp directory, destination file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Returns true if this error ended a retry loop.
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }

    /// Returns the HTTP status code for [`FetchError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn exhausted_message(attempts: &u32, last: &Option<Box<ClientError>>) -> String {
    match last {
        Some(err) => format!("Failed to download the file after {attempts} attempts: {err}"),
        None => UNKNOWN_EXHAUSTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_with_last_error() {
        let err = FetchError::RetryExhausted {
            attempts: 3,
            last: Some(Box::new(ClientError::CredentialRetrieval("expired".into()))),
        };
        assert!(err.is_retry_exhausted());
        assert_eq!(
            err.to_string(),
            "Failed to download the file after 3 attempts: Failed to retrieve credentials: expired"
        );
    }

    #[test]
    fn test_exhausted_without_error_is_deterministic() {
        let err = FetchError::RetryExhausted {
            attempts: 0,
            last: None,
        };
        assert_eq!(err.to_string(), UNKNOWN_EXHAUSTION);
    }

    #[test]
    fn test_status_accessor() {
        let err = FetchError::Status {
            url: "https://example.com/a.txt".into(),
            status: 404,
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404 fetching https://example.com/a.txt");
    }
}
