//! Core error types for s3reader.

use thiserror::Error;

// ============================================================================
// Address Error
// ============================================================================

/// A remote address that cannot be parsed or routed.
///
/// These errors are fatal and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Object-store URI without a bucket segment.
    #[error("Malformed object-store address, no bucket: {0}")]
    MissingBucket(String),

    /// The address does not use a scheme the fetcher accepts.
    #[error("The path should start with {expected}. (path={address})")]
    UnsupportedScheme {
        /// Accepted scheme prefixes.
        expected: &'static str,
        /// The rejected address.
        address: String,
    },

    /// URL that could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local file name that is not a single plain path segment.
    #[error("Invalid file name {0:?}: expected a single path segment")]
    InvalidFileName(String),
}

// ============================================================================
// Client Error
// ============================================================================

/// Error raised by an object-store client or its factory.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials could not be retrieved (expired session, failed assume-role).
    #[error("Failed to retrieve credentials: {0}")]
    CredentialRetrieval(String),

    /// Generic error reported by the storage service.
    #[error("Client error: {0}")]
    Service(String),

    /// Local IO failure while writing the object.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Returns true if this error is worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::CredentialRetrieval(_) | ClientError::Service(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ClientError::CredentialRetrieval("expired".into()).is_transient());
        assert!(ClientError::Service("AccessDenied".into()).is_transient());
        assert!(!ClientError::Other("no client".into()).is_transient());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!ClientError::from(io).is_transient());
    }

    #[test]
    fn test_unsupported_scheme_message() {
        let err = AddressError::UnsupportedScheme {
            expected: "http: or https:",
            address: "ftp://host/file".into(),
        };
        assert_eq!(
            err.to_string(),
            "The path should start with http: or https:. (path=ftp://host/file)"
        );
    }
}
