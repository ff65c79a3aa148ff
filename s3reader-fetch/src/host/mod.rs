//! Host backends for s3reader fetchers.
//!
//! - [`http`] - single-shot HTTP(S) downloads
//! - `aws` - AWS SDK client factory (feature `aws`)

#[cfg(feature = "aws")]
pub mod aws;
pub mod http;

#[cfg(feature = "aws")]
pub use aws::{AwsClientFactory, AwsS3Client};
pub use http::HttpFetcher;
