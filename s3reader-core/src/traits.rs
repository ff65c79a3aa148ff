//! Trait definitions for s3reader.
//!
//! Credential resolution and session construction live outside the
//! materialization engine. The engine only asks a [`ClientFactory`] for an
//! authenticated [`ObjectStoreClient`] and then asks that client to download
//! one object.

use std::path::Path;

use crate::error::ClientError;
use crate::options::ClientOptions;

/// An authenticated object-store client.
pub trait ObjectStoreClient {
    /// Downloads `key` from `bucket` into the file at `destination`.
    ///
    /// The destination's parent directory exists; the file itself may not.
    fn download_object(&self, bucket: &str, key: &str, destination: &Path)
        -> Result<(), ClientError>;
}

/// Builds authenticated object-store clients.
///
/// Implementations own every detail of credential resolution: profiles,
/// static keys, session tokens, assume-role chaining and region lookup.
/// Failing to obtain credentials should be reported as
/// [`ClientError::CredentialRetrieval`] so callers can retry.
pub trait ClientFactory: Send + Sync {
    /// Returns a ready-to-use client for `options`.
    fn connect(&self, options: &ClientOptions) -> Result<Box<dyn ObjectStoreClient>, ClientError>;
}

impl<F> ClientFactory for F
where
    F: Fn(&ClientOptions) -> Result<Box<dyn ObjectStoreClient>, ClientError> + Send + Sync,
{
    fn connect(&self, options: &ClientOptions) -> Result<Box<dyn ObjectStoreClient>, ClientError> {
        self(options)
    }
}
