//! Options handed to the credentialed client factory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default session name used when assuming a role.
pub const DEFAULT_SESSION_NAME: &str = "default-session";

/// Default number of per-request attempts inside the client.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

// ============================================================================
// Retry Mode
// ============================================================================

/// Retry mode the client applies to individual requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Standard retry mode.
    #[default]
    Standard,
    /// Legacy retry mode.
    Legacy,
    /// Adaptive retry mode with client-side rate limiting.
    Adaptive,
}

impl RetryMode {
    /// Returns the configuration name for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Legacy => "legacy",
            Self::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for RetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "legacy" => Ok(Self::Legacy),
            "adaptive" => Ok(Self::Adaptive),
            other => Err(format!("unknown retry mode: {other}")),
        }
    }
}

// ============================================================================
// Client Options
// ============================================================================

/// Credential and session settings for building an object-store client.
///
/// All credential fields are optional; anything left unset is resolved by the
/// client factory (environment, shared config files, instance metadata).
/// When `role_arn` is set the factory assumes that role and the static keys
/// only serve as the source identity.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Named profile from the shared config files.
    pub profile_name: Option<String>,
    /// Static access key id.
    pub access_key_id: Option<String>,
    /// Static secret access key.
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
    /// Region name.
    pub region_name: Option<String>,
    /// Role to assume.
    pub role_arn: Option<String>,
    /// Session name used when assuming `role_arn`.
    pub session_name: String,
    /// Per-request retry mode.
    pub retry_mode: RetryMode,
    /// Per-request attempt limit inside the client.
    pub max_attempts: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            profile_name: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            region_name: None,
            role_arn: None,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            retry_mode: RetryMode::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ClientOptions {
    /// Creates options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the profile name.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile_name = Some(profile.into());
        self
    }

    /// Sets static credentials.
    pub fn with_static_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self.session_token = session_token;
        self
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region_name = Some(region.into());
        self
    }

    /// Sets the role to assume.
    pub fn with_role(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Sets the assume-role session name.
    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    /// Sets the per-request retry mode and attempt limit.
    pub fn with_request_retries(mut self, mode: RetryMode, max_attempts: u32) -> Self {
        self.retry_mode = mode;
        self.max_attempts = max_attempts;
        self
    }

    /// Returns true if both halves of a static key pair are present.
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("profile_name", &self.profile_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(self.secret_access_key.as_ref()))
            .field("session_token", &redact(self.session_token.as_ref()))
            .field("region_name", &self.region_name)
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("retry_mode", &self.retry_mode)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
