//! Fetch context shared by every materialization.
//!
//! The context bundles the collaborators a fetcher may need: the credentialed
//! client factory and its options, the credential retry policy, and an
//! optional shared HTTP client.

use std::fmt;
use std::sync::Arc;

use reqwest::blocking::Client;
use s3reader_core::{ClientError, ClientFactory, ClientOptions, ObjectStoreClient};

use crate::retry::RetryPolicy;

// ============================================================================
// Default Client Factory
// ============================================================================

/// Factory used when no object-store backend is available.
///
/// Every connect fails with a non-transient error, so `s3:` addresses fail
/// fast instead of burning through the retry budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredClientFactory;

impl ClientFactory for UnconfiguredClientFactory {
    fn connect(&self, _options: &ClientOptions) -> Result<Box<dyn ObjectStoreClient>, ClientError> {
        Err(ClientError::Other(
            "no object-store client configured (enable the `aws` feature or supply a client factory)"
                .to_string(),
        ))
    }
}

/// The factory used by [`FetchContext::default`].
pub fn default_client_factory() -> Arc<dyn ClientFactory> {
    #[cfg(feature = "aws")]
    {
        Arc::new(crate::host::aws::AwsClientFactory::new())
    }
    #[cfg(not(feature = "aws"))]
    {
        Arc::new(UnconfiguredClientFactory)
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Collaborators for fetching remote addresses.
#[derive(Clone)]
pub struct FetchContext {
    /// Builds authenticated object-store clients.
    pub client_factory: Arc<dyn ClientFactory>,
    /// Options passed to the client factory.
    pub client_options: ClientOptions,
    /// Retry policy around credential retrieval.
    pub retry_policy: RetryPolicy,
    /// Shared HTTP client. A new one is built per fetch when unset.
    pub http_client: Option<Client>,
}

impl FetchContext {
    /// Creates a context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::default()
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self {
            client_factory: default_client_factory(),
            client_options: ClientOptions::default(),
            retry_policy: RetryPolicy::default(),
            http_client: None,
        }
    }
}

impl fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchContext")
            .field("client_options", &self.client_options)
            .field("retry_policy", &self.retry_policy)
            .field("shared_http_client", &self.http_client.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    client_factory: Option<Arc<dyn ClientFactory>>,
    client_options: Option<ClientOptions>,
    retry_policy: Option<RetryPolicy>,
    http_client: Option<Client>,
}

impl FetchContextBuilder {
    /// Sets the client factory.
    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    /// Sets the client options.
    pub fn client_options(mut self, options: ClientOptions) -> Self {
        self.client_options = Some(options);
        self
    }

    /// Sets the credential retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets a shared HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the context.
    pub fn build(self) -> FetchContext {
        FetchContext {
            client_factory: self.client_factory.unwrap_or_else(default_client_factory),
            client_options: self.client_options.unwrap_or_default(),
            retry_policy: self.retry_policy.unwrap_or_default(),
            http_client: self.http_client,
        }
    }
}
