//! Remote addresses as local files.
//!
//! A [`File`] is constructed from any supported address and, once
//! construction returns, exposes an ordinary local path:
//!
//! - local paths are passed through (normalized) without touching the disk;
//! - `s3://` objects and `http(s)://` URLs are downloaded into a private
//!   temp directory that lives exactly as long as the `File`.
//!
//! Construction blocks until the download completes. If it fails the temp
//! directory is removed before the error is returned.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use s3reader_core::{Address, ClientFactory, ClientOptions, classify, display_name, normalize};
use s3reader_fetch::{FetchContext, FetchError, Fetcher, RetryPolicy, ScopedTempResource};
use tracing::{debug, instrument, warn};

use crate::config::Config;

// ============================================================================
// File State
// ============================================================================

/// Lifecycle of a [`File`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Backed by a local path (or nothing, for an empty address).
    Local,
    /// Backed by a downloaded copy.
    Ready,
    /// Torn down. A downloaded copy no longer exists.
    Released,
}

// ============================================================================
// File
// ============================================================================

/// A local view of a local, object-store, or HTTP(S) address.
#[derive(Debug)]
pub struct File {
    original: String,
    address: Address,
    file_name: String,
    local_path: PathBuf,
    temp: ScopedTempResource,
    state: FileState,
}

impl File {
    /// Materializes `path` with the default fetch context.
    ///
    /// # Errors
    ///
    /// Returns the address, client, retry, or transport error that stopped
    /// the download.
    pub fn open(path: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder(path).open()
    }

    /// Creates a builder for `path`.
    pub fn builder(path: impl Into<String>) -> FileBuilder {
        FileBuilder::new(path)
    }

    /// Local path of the file.
    pub fn path(&self) -> &Path {
        &self.local_path
    }

    /// Display name; the final segment of the address unless overridden.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The address as given, after normalization.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The classified address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Returns true if the file was downloaded.
    pub fn is_remote(&self) -> bool {
        self.address.is_remote()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FileState {
        self.state
    }

    /// Temp directory holding the downloaded copy, while live.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp.path()
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns the IO error, including after [`File::close`] on a remote file.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.local_path)
    }

    /// Reads the whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the IO error, including after [`File::close`] on a remote file.
    pub fn read_to_string(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.local_path)
    }

    /// Deletes the downloaded copy. Repeated calls are no-ops.
    pub fn close(&mut self) {
        if self.state == FileState::Released {
            return;
        }
        self.temp.release();
        self.state = FileState::Released;
        debug!(address = %self.original, "Released file");
    }
}

impl AsRef<Path> for File {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl Drop for File {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`File`].
#[must_use]
pub struct FileBuilder {
    path: String,
    file_name: Option<String>,
    context: Option<FetchContext>,
    client_options: Option<ClientOptions>,
    client_factory: Option<Arc<dyn ClientFactory>>,
    max_trials: Option<u32>,
    retry_delay: Option<Duration>,
}

impl FileBuilder {
    /// Creates a builder for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_name: None,
            context: None,
            client_options: None,
            client_factory: None,
            max_trials: None,
            retry_delay: None,
        }
    }

    /// Overrides the local file name of a downloaded copy.
    ///
    /// Must be a single path segment; [`FileBuilder::open`] rejects anything
    /// that would land outside the temp directory.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Starts from an existing fetch context.
    pub fn context(mut self, context: FetchContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Starts from a configuration.
    pub fn config(self, config: &Config) -> Self {
        self.context(config.context())
    }

    /// Sets the options passed to the client factory.
    pub fn client_options(mut self, options: ClientOptions) -> Self {
        self.client_options = Some(options);
        self
    }

    /// Sets the client factory.
    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    /// Sets the number of credential retry attempts.
    pub fn max_trials(mut self, max_trials: u32) -> Self {
        self.max_trials = Some(max_trials);
        self
    }

    /// Sets the delay between credential retry attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    fn into_parts(self) -> (String, Option<String>, FetchContext) {
        let mut ctx = self.context.unwrap_or_default();
        if let Some(options) = self.client_options {
            ctx.client_options = options;
        }
        if let Some(factory) = self.client_factory {
            ctx.client_factory = factory;
        }
        if let Some(max_trials) = self.max_trials {
            ctx.retry_policy = RetryPolicy {
                max_attempts: max_trials,
                ..ctx.retry_policy
            };
        }
        if let Some(delay) = self.retry_delay {
            ctx.retry_policy = ctx.retry_policy.with_delay(delay);
        }
        (self.path, self.file_name, ctx)
    }

    /// Classifies the address and downloads it if remote.
    ///
    /// # Errors
    ///
    /// Returns the address, client, retry, or transport error that stopped
    /// the download. No temp directory survives a failed open.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn open(self) -> Result<File, FetchError> {
        let (path, file_name, ctx) = self.into_parts();

        let original = normalize(&path);
        let address = classify(&path)?;
        let file_name = file_name.unwrap_or_else(|| display_name(&original));
        debug!(kind = address.kind(), file_name = %file_name, "Classified address");

        let fetcher = Fetcher::for_address(&address, &ctx)?;
        let mut temp = ScopedTempResource::new();

        let local_path = match fetcher.materialize(&mut temp, &file_name) {
            Ok(local_path) => local_path,
            Err(e) => {
                warn!(error = %e, "Failed to materialize file");
                temp.release();
                return Err(e);
            }
        };

        let state = if fetcher.is_remote() {
            FileState::Ready
        } else {
            FileState::Local
        };

        Ok(File {
            original,
            address,
            file_name,
            local_path,
            temp,
            state,
        })
    }
}

impl fmt::Debug for FileBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBuilder")
            .field("path", &self.path)
            .field("file_name", &self.file_name)
            .field("context", &self.context)
            .field("client_options", &self.client_options)
            .field("max_trials", &self.max_trials)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_passthrough() {
        let file = File::open("/tmp//already-local.txt").unwrap();

        assert_eq!(file.path(), Path::new("/tmp/already-local.txt"));
        assert_eq!(file.file_name(), "already-local.txt");
        assert_eq!(file.state(), FileState::Local);
        assert!(!file.is_remote());
        assert!(file.temp_dir().is_none());
    }

    #[test]
    fn test_empty_address() {
        let file = File::open("").unwrap();

        assert_eq!(file.address(), &Address::None);
        assert_eq!(file.path(), Path::new(""));
        assert_eq!(file.file_name(), "");
        assert!(file.temp_dir().is_none());
    }

    #[test]
    fn test_file_name_override() {
        let file = File::builder("data/report.csv")
            .file_name("renamed.csv")
            .open()
            .unwrap();
        assert_eq!(file.file_name(), "renamed.csv");
        assert_eq!(file.path(), Path::new("data/report.csv"));
    }

    #[test]
    fn test_malformed_object_address() {
        let err = File::open("s3:/no-bucket").unwrap_err();
        assert!(matches!(err, FetchError::Address(_)));
    }

    #[test]
    fn test_absolute_file_name_is_rejected_for_remote() {
        let err = File::builder("s3://bucket/key.csv")
            .file_name("/etc/key.csv")
            .open()
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Address(s3reader_core::AddressError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut file = File::open("local.txt").unwrap();
        file.close();
        file.close();
        assert_eq!(file.state(), FileState::Released);
    }

    #[test]
    fn test_builder_overrides_retry_policy() {
        let (_, _, ctx) = File::builder("x")
            .max_trials(3)
            .retry_delay(Duration::from_millis(10))
            .into_parts();
        assert_eq!(ctx.retry_policy.max_attempts, 3);
        assert_eq!(ctx.retry_policy.delay, Duration::from_millis(10));
    }
}
