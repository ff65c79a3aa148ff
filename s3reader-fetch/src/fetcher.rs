//! One fetcher per address kind, selected once from the classified address.

use std::path::PathBuf;

use s3reader_core::{Address, validate_file_name};
use tracing::debug;

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::host::http::HttpFetcher;
use crate::object_store::ObjectStoreFetcher;
use crate::temp::ScopedTempResource;

/// How an address is materialized.
#[derive(Debug, Clone)]
pub enum Fetcher {
    /// Empty address; nothing to do.
    None,
    /// Already local; passed through untouched.
    Local(PathBuf),
    /// Downloaded from an object store.
    ObjectStore(ObjectStoreFetcher),
    /// Downloaded over HTTP(S).
    Http(HttpFetcher),
}

impl Fetcher {
    /// Selects the fetcher for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if an HTTP client has to be built and
    /// cannot be.
    pub fn for_address(address: &Address, ctx: &FetchContext) -> Result<Self, FetchError> {
        let fetcher = match address {
            Address::None => Self::None,
            Address::Local { path } => Self::Local(path.clone()),
            Address::ObjectStore { bucket, key } => Self::ObjectStore(ObjectStoreFetcher::new(
                bucket.as_str(),
                key.as_str(),
                ctx.client_factory.clone(),
                ctx.client_options.clone(),
                ctx.retry_policy,
            )),
            Address::Http { url } => Self::Http(match &ctx.http_client {
                Some(client) => HttpFetcher::with_client(client.clone(), url.as_str()),
                None => HttpFetcher::new(url.as_str())?,
            }),
        };
        Ok(fetcher)
    }

    /// Returns true if this fetcher downloads.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::ObjectStore(_) | Self::Http(_))
    }

    /// Produces the local path, downloading into `temp` when remote.
    ///
    /// The temp directory is only acquired for remote fetchers, and only once
    /// `file_name` is known to stay inside it. On error the directory may
    /// already exist; releasing it is the caller's job.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Address`] if `file_name` is not a single path segment
    /// - the backend's [`FetchError`], or the IO error from creating the temp
    ///   directory
    pub fn materialize(
        &self,
        temp: &mut ScopedTempResource,
        file_name: &str,
    ) -> Result<PathBuf, FetchError> {
        match self {
            Self::None => Ok(PathBuf::new()),
            Self::Local(path) => {
                debug!(path = %path.display(), "Local path, no fetch");
                Ok(path.clone())
            }
            Self::ObjectStore(fetcher) => {
                let file_name = validate_file_name(file_name)?;
                fetcher.fetch(temp.acquire()?, file_name)
            }
            Self::Http(fetcher) => {
                let file_name = validate_file_name(file_name)?;
                fetcher.fetch(temp.acquire()?, file_name)
            }
        }
    }
}
