//! Object-store clients backed by the AWS SDK.
//!
//! [`AwsClientFactory`] resolves credentials from the [`ClientOptions`]
//! (static keys, profile, region, optional assume-role) and eagerly asks the
//! provider chain for credentials so that a failed lookup surfaces at
//! connect time as [`ClientError::CredentialRetrieval`], where the fetcher's
//! retry loop can see it.
//!
//! The SDK is async; each client owns a current-thread runtime and blocks on
//! it, which keeps the public API synchronous.

use std::path::Path;
use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::sts::AssumeRoleProvider;
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use s3reader_core::{ClientError, ClientFactory, ClientOptions, ObjectStoreClient, RetryMode};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

/// Provider name attached to static credentials.
const STATIC_PROVIDER_NAME: &str = "s3reader-static";

// ============================================================================
// Factory
// ============================================================================

/// Builds S3 clients with the AWS SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsClientFactory;

impl AwsClientFactory {
    /// Creates a factory.
    pub fn new() -> Self {
        Self
    }
}

impl ClientFactory for AwsClientFactory {
    #[instrument(skip(self, options), fields(profile = ?options.profile_name, role = ?options.role_arn))]
    fn connect(&self, options: &ClientOptions) -> Result<Box<dyn ObjectStoreClient>, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = runtime.block_on(build_client(options))?;
        debug!("S3 client ready");

        Ok(Box::new(AwsS3Client {
            runtime: Arc::new(runtime),
            client,
        }))
    }
}

fn retry_config(options: &ClientOptions) -> RetryConfig {
    let config = match options.retry_mode {
        RetryMode::Adaptive => RetryConfig::adaptive(),
        RetryMode::Standard | RetryMode::Legacy => RetryConfig::standard(),
    };
    config.with_max_attempts(options.max_attempts)
}

async fn build_client(options: &ClientOptions) -> Result<aws_sdk_s3::Client, ClientError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(retry_config(options));

    if let Some(profile) = &options.profile_name {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &options.region_name {
        loader = loader.region(Region::new(region.clone()));
    }
    if let (Some(key_id), Some(secret)) = (&options.access_key_id, &options.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            options.session_token.clone(),
            None,
            STATIC_PROVIDER_NAME,
        ));
    }

    let mut config = loader.load().await;

    if let Some(role_arn) = &options.role_arn {
        let provider = AssumeRoleProvider::builder(role_arn)
            .session_name(&options.session_name)
            .configure(&config)
            .build()
            .await;
        config = config
            .into_builder()
            .credentials_provider(SharedCredentialsProvider::new(provider))
            .build();
    }

    let provider = config
        .credentials_provider()
        .ok_or_else(|| ClientError::CredentialRetrieval("no credentials provider configured".into()))?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| ClientError::CredentialRetrieval(DisplayErrorContext(&e).to_string()))?;

    Ok(aws_sdk_s3::Client::new(&config))
}

// ============================================================================
// Client
// ============================================================================

/// S3 client that blocks on its own runtime.
#[derive(Debug)]
pub struct AwsS3Client {
    runtime: Arc<Runtime>,
    client: aws_sdk_s3::Client,
}

impl ObjectStoreClient for AwsS3Client {
    fn download_object(&self, bucket: &str, key: &str, destination: &Path) -> Result<(), ClientError> {
        self.runtime.block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| ClientError::Service(DisplayErrorContext(&e).to_string()))?;

            let mut body = output.body.into_async_read();
            let mut file = tokio::fs::File::create(destination).await?;
            let bytes = tokio::io::copy(&mut body, &mut file).await?;
            file.flush().await?;

            debug!(bucket, key, bytes, "Object written");
            Ok::<(), ClientError>(())
        })
    }
}
