//! Single-shot HTTP(S) downloads.
//!
//! One blocking GET per fetch, body streamed straight to disk. No retry and
//! no range requests; any transport failure or non-2xx status is returned
//! as is.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use s3reader_core::AddressError;
use s3reader_core::address::HTTP_PREFIXES;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::FetchError;

/// User agent string for s3reader.
const USER_AGENT: &str = concat!("s3reader/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Fetcher
// ============================================================================

/// Downloads one HTTP(S) URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    inner: Client,
    url: String,
}

impl HttpFetcher {
    /// Creates a fetcher for `url` with a fresh client.
    ///
    /// The client has no request timeout; callers that need one should wrap
    /// the whole materialization.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the TLS backend cannot be
    /// initialized.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self::with_client(client, url))
    }

    /// Creates a fetcher that reuses an existing client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            inner: client,
            url: url.into(),
        }
    }

    /// The URL this fetcher downloads.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks the scheme and parses the URL.
    fn validated_url(&self) -> Result<Url, AddressError> {
        if !HTTP_PREFIXES.iter().any(|p| self.url.starts_with(p)) {
            return Err(AddressError::UnsupportedScheme {
                expected: "http: or https:",
                address: self.url.clone(),
            });
        }
        Url::parse(&self.url).map_err(|e| AddressError::InvalidUrl(format!("{}: {e}", self.url)))
    }

    /// Downloads the URL to `destination_dir/file_name`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Address`] if the URL is not HTTP(S) or does not parse
    /// - [`FetchError::Transport`] on connection or body read failure
    /// - [`FetchError::Status`] on a non-2xx response
    /// - [`FetchError::Io`] if the destination cannot be written
    #[instrument(skip(self), fields(url = %self.url))]
    pub fn fetch(&self, destination_dir: &Path, file_name: &str) -> Result<PathBuf, FetchError> {
        let url = self.validated_url()?;
        debug!("GET request");

        let mut response = self.inner.get(url).send()?;
        let status = response.status();
        debug!(status = %status, "Response received");

        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let destination = destination_dir.join(file_name);
        let mut writer = BufWriter::new(File::create(&destination)?);
        let bytes = response.copy_to(&mut writer)?;
        writer.flush()?;

        info!(path = %destination.display(), bytes, "Downloaded URL");
        Ok(destination)
    }
}

// ============================================================================
// Tests
// ============================================================================
