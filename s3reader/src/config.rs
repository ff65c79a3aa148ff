//! Configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use s3reader_core::ClientOptions;
use s3reader_fetch::retry::{DEFAULT_DELAY, DEFAULT_MAX_TRIALS};
use s3reader_fetch::{FetchContext, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Persistent settings for materializing files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Options passed to the object-store client factory.
    #[serde(default)]
    pub client: ClientOptions,
    /// Attempts for the credential retry loop.
    #[serde(default = "default_max_trials")]
    pub max_trials: u32,
    /// Delay between credential retries, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_max_trials() -> u32 {
    DEFAULT_MAX_TRIALS
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_DELAY.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientOptions::default(),
            max_trials: default_max_trials(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("s3reader")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    ///
    /// # Errors
    ///
    /// See [`Config::save_to`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// The credential retry policy described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_trials).with_delay(Duration::from_secs(self.retry_delay_secs))
    }

    /// Builds a fetch context using the default client factory.
    pub fn context(&self) -> FetchContext {
        FetchContext::builder()
            .client_options(self.client.clone())
            .retry_policy(self.retry_policy())
            .build()
    }
}
