//! Scoped temporary storage for downloaded copies.
//!
//! A [`ScopedTempResource`] starts empty, creates its directory on the first
//! [`acquire`](ScopedTempResource::acquire), and deletes it exactly once: on
//! [`release`](ScopedTempResource::release) or when dropped, whichever comes
//! first.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

/// Prefix for every temp directory created by s3reader.
pub const TEMP_PREFIX: &str = "s3reader-";

/// Owner of at most one live temporary directory.
#[derive(Debug, Default)]
pub struct ScopedTempResource {
    dir: Option<TempDir>,
}

impl ScopedTempResource {
    /// Creates an empty resource. Nothing touches the filesystem yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live directory, creating it if needed.
    ///
    /// Repeated calls while live return the same directory.
    ///
    /// # Errors
    ///
    /// Returns the IO error from creating the directory.
    pub fn acquire(&mut self) -> io::Result<&Path> {
        let dir = match self.dir.take() {
            Some(dir) => dir,
            None => {
                let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
                debug!(path = %dir.path().display(), "Created temp directory");
                dir
            }
        };
        Ok(self.dir.insert(dir).path())
    }

    /// Path of the live directory, if any.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Returns true while a directory is held.
    pub fn is_live(&self) -> bool {
        self.dir.is_some()
    }

    /// Deletes the directory. A no-op if nothing is held.
    ///
    /// Deletion failures are logged, not returned.
    pub fn release(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        let path: PathBuf = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => debug!(path = %path.display(), "Removed temp directory"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temp directory"),
        }
    }
}

impl Drop for ScopedTempResource {
    fn drop(&mut self) {
        self.release();
    }
}
