// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # s3reader Fetch
//!
//! Fetchers that turn remote addresses into files on local disk.
//!
//! ## Building blocks
//!
//! - [`retry::RetryPolicy`] - bounded retry with a fixed delay
//! - [`temp::ScopedTempResource`] - temp directory deleted exactly once
//! - [`rng`] - process-wide generator and the [`rng::RngStateGuard`]
//!
//! ## Fetchers
//!
//! - [`object_store::ObjectStoreFetcher`] - credentialed object-store
//!   download, retried on credential failures
//! - [`host::http::HttpFetcher`] - one blocking GET
//! - [`fetcher::Fetcher`] - picks one of the above from an [`Address`]
//!
//! [`context::FetchContext`] carries the client factory, its options and the
//! retry policy.
//!
//! [`Address`]: s3reader_core::Address

pub mod context;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod object_store;
pub mod retry;
pub mod rng;
pub mod temp;

pub use context::{FetchContext, FetchContextBuilder, UnconfiguredClientFactory};
pub use error::FetchError;
pub use fetcher::Fetcher;
pub use host::http::HttpFetcher;
#[cfg(feature = "aws")]
pub use host::aws::AwsClientFactory;
pub use object_store::ObjectStoreFetcher;
pub use retry::{RetryError, RetryPolicy, RetryState};
pub use rng::{RngSnapshot, RngStateGuard};
pub use temp::ScopedTempResource;
