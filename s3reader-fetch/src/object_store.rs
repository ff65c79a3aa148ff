//! Object-store downloads with credential retry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use s3reader_core::{ClientError, ClientFactory, ClientOptions};
use tracing::{info, instrument};

use crate::error::FetchError;
use crate::retry::{RetryError, RetryPolicy};
use crate::rng::RngStateGuard;

/// Downloads one object through a credentialed client.
///
/// Client construction and the download run together inside the retry
/// policy, so an expired session is rebuilt from scratch on the next attempt.
/// [`ClientError::is_transient`] decides what is retried.
#[derive(Clone)]
pub struct ObjectStoreFetcher {
    bucket: String,
    key: String,
    factory: Arc<dyn ClientFactory>,
    options: ClientOptions,
    policy: RetryPolicy,
}

impl ObjectStoreFetcher {
    /// Creates a fetcher for `bucket`/`key`.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        factory: Arc<dyn ClientFactory>,
        options: ClientOptions,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            factory,
            options,
            policy,
        }
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Downloads the object to `destination_dir/file_name`.
    ///
    /// The global RNG state is restored before returning, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Client`] for a non-transient client error
    /// - [`FetchError::RetryExhausted`] when every attempt failed transiently
    #[instrument(skip(self), fields(bucket = %self.bucket, key = %self.key))]
    pub fn fetch(&self, destination_dir: &Path, file_name: &str) -> Result<PathBuf, FetchError> {
        let destination = destination_dir.join(file_name);

        let result = {
            let _rng = RngStateGuard::capture();
            self.policy
                .run(|| self.download(&destination), ClientError::is_transient)
        };

        match result {
            Ok(()) => {
                info!(path = %destination.display(), "Downloaded object");
                Ok(destination)
            }
            Err(RetryError::Permanent(e)) => Err(FetchError::Client(e)),
            Err(RetryError::Exhausted { attempts, last }) => Err(FetchError::RetryExhausted {
                attempts,
                last: last.map(Box::new),
            }),
        }
    }

    fn download(&self, destination: &Path) -> Result<(), ClientError> {
        let client = self.factory.connect(&self.options)?;
        client.download_object(&self.bucket, &self.key, destination)
    }
}

impl fmt::Debug for ObjectStoreFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreFetcher")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("options", &self.options)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{self, RngSnapshot, TEST_LOCK};
    use rand::RngCore;
    use s3reader_core::ObjectStoreClient;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Serves objects from memory and fails the first `failures` connects.
    struct FlakyFactory {
        failures: u32,
        error: fn() -> ClientError,
        connects: AtomicU32,
        body: &'static [u8],
    }

    struct MemoryClient {
        body: &'static [u8],
        requests: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ObjectStoreClient for MemoryClient {
        fn download_object(
            &self,
            bucket: &str,
            key: &str,
            destination: &Path,
        ) -> Result<(), ClientError> {
            self.requests
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));
            std::fs::write(destination, self.body)?;
            Ok(())
        }
    }

    static REQUESTS: std::sync::LazyLock<Arc<Mutex<Vec<(String, String)>>>> =
        std::sync::LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

    impl ClientFactory for FlakyFactory {
        fn connect(
            &self,
            _options: &ClientOptions,
        ) -> Result<Box<dyn ObjectStoreClient>, ClientError> {
            // Session construction draws from the shared generator.
            rng::with_global_rng(|r| r.next_u64());

            let n = self.connects.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err((self.error)());
            }
            Ok(Box::new(MemoryClient {
                body: self.body,
                requests: Arc::clone(&REQUESTS),
            }))
        }
    }

    fn factory(failures: u32, error: fn() -> ClientError) -> Arc<FlakyFactory> {
        Arc::new(FlakyFactory {
            failures,
            error,
            connects: AtomicU32::new(0),
            body: b"a,b\n1,2\n",
        })
    }

    fn credential_error() -> ClientError {
        ClientError::CredentialRetrieval("token expired".into())
    }

    fn fatal_error() -> ClientError {
        ClientError::Other("unsupported".into())
    }

    /// Every fetch touches the global generator.
    fn serial() -> std::sync::MutexGuard<'static, ()> {
        TEST_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn fetcher(factory: Arc<FlakyFactory>, max_trials: u32) -> ObjectStoreFetcher {
        ObjectStoreFetcher::new(
            "my-bucket",
            "data/file.csv",
            factory,
            ClientOptions::default(),
            RetryPolicy::new(max_trials).with_delay(Duration::ZERO),
        )
    }

    #[test]
    fn test_fetch_writes_object() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(0, credential_error);

        let path = fetcher(factory.clone(), 3).fetch(dir.path(), "file.csv").unwrap();

        assert_eq!(path, dir.path().join("file.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");
        assert_eq!(factory.connects.load(Ordering::SeqCst), 1);
        assert!(
            REQUESTS
                .lock()
                .unwrap()
                .contains(&("my-bucket".to_string(), "data/file.csv".to_string()))
        );
    }

    #[test]
    fn test_fetch_retries_credential_errors() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(2, credential_error);

        let path = fetcher(factory.clone(), 3).fetch(dir.path(), "file.csv").unwrap();

        assert!(path.exists());
        assert_eq!(factory.connects.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fetch_exhausts_after_max_trials() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(u32::MAX, credential_error);

        let err = fetcher(factory.clone(), 4)
            .fetch(dir.path(), "file.csv")
            .unwrap_err();

        match err {
            FetchError::RetryExhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert!(matches!(
                    last.as_deref(),
                    Some(ClientError::CredentialRetrieval(_))
                ));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(factory.connects.load(Ordering::SeqCst), 4);
        assert!(!dir.path().join("file.csv").exists());
    }

    #[test]
    fn test_fetch_zero_trials_uses_fallback_error() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();
        let err = fetcher(factory(0, credential_error), 0)
            .fetch(dir.path(), "file.csv")
            .unwrap_err();

        assert_eq!(err.to_string(), crate::error::UNKNOWN_EXHAUSTION);
    }

    #[test]
    fn test_fetch_does_not_retry_fatal_errors() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(1, fatal_error);

        let err = fetcher(factory.clone(), 5)
            .fetch(dir.path(), "file.csv")
            .unwrap_err();

        assert!(matches!(err, FetchError::Client(ClientError::Other(_))));
        assert_eq!(factory.connects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_restores_rng_state() {
        let _serial = serial();
        let dir = tempfile::tempdir().unwrap();

        for failures in [0, 2, u32::MAX] {
            rng::seed_global_rng(1234);
            let before = RngSnapshot::capture();

            let _ = fetcher(factory(failures, credential_error), 3).fetch(dir.path(), "file.csv");

            let after = RngSnapshot::capture();
            assert_eq!(before.to_rng().next_u64(), after.to_rng().next_u64());
        }
    }
}
