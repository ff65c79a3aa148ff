//! Address classification.
//!
//! Every input string is normalized first: accidental duplicate slashes from
//! naive path joins are collapsed while the single slash that follows a scheme
//! colon is preserved. The normalized string is then routed by its scheme
//! prefix (case-sensitive):
//!
//! | prefix | variant |
//! |---|---|
//! | `s3:` | [`Address::ObjectStore`] |
//! | `http:`, `https:` | [`Address::Http`] |
//! | anything else | [`Address::Local`] |
//!
//! The empty string is the degenerate [`Address::None`], which never touches
//! the filesystem or the network.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::AddressError;

/// Separator between a scheme and the rest of the address.
pub const SCHEME_SEPARATOR: &str = ":/";

/// Prefix routed to the object-store backend.
pub const OBJECT_STORE_PREFIX: &str = "s3:";

/// Prefixes routed to the HTTP backend.
pub const HTTP_PREFIXES: [&str; 2] = ["http:", "https:"];

// ============================================================================
// Address
// ============================================================================

/// A classified input address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Address {
    /// Empty input. Materializes to nothing.
    None,
    /// A path on the local filesystem.
    Local {
        /// Normalized path.
        path: PathBuf,
    },
    /// An object in a bucket (`s3://bucket/key`).
    ObjectStore {
        /// Bucket name.
        bucket: String,
        /// Object key, possibly containing `/`.
        key: String,
    },
    /// An HTTP(S) URL.
    Http {
        /// Normalized URL.
        url: String,
    },
}

impl Address {
    /// Returns true if materializing this address requires a download.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::ObjectStore { .. } | Self::Http { .. })
    }

    /// Short name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Local { .. } => "local",
            Self::ObjectStore { .. } => "object_store",
            Self::Http { .. } => "http",
        }
    }

    /// Returns the local path for [`Address::Local`].
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local { path } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Local { path } => write!(f, "{}", path.display()),
            Self::ObjectStore { bucket, key } if key.is_empty() => write!(f, "s3://{bucket}"),
            Self::ObjectStore { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Http { url } => f.write_str(url),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        classify(s)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Normalizes and classifies a raw address.
///
/// # Errors
///
/// Returns [`AddressError::MissingBucket`] for an `s3:` address without a
/// bucket segment.
pub fn classify(raw: &str) -> Result<Address, AddressError> {
    if raw.is_empty() {
        return Ok(Address::None);
    }

    let normalized = normalize(raw);

    if normalized.starts_with(OBJECT_STORE_PREFIX) {
        let (bucket, key) = extract_object_info(&normalized)?;
        return Ok(Address::ObjectStore { bucket, key });
    }

    if HTTP_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
        return Ok(Address::Http { url: normalized });
    }

    Ok(Address::Local {
        path: PathBuf::from(normalized),
    })
}

/// Collapses accidental duplicate slashes.
///
/// With a scheme separator the string is split on its first `:/` and rebuilt
/// as `scheme:/` followed by the normalized remainder, so `s3://b//k` becomes
/// `s3://b/k`. Without one the whole string is normalized as a path.
/// The result is stable under repeated normalization.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    match raw.split_once(SCHEME_SEPARATOR) {
        Some((scheme, rest)) => format!("{scheme}{SCHEME_SEPARATOR}{}", normalize_path(rest)),
        None => normalize_path(raw),
    }
}

/// Lexical path normalization.
///
/// Drops empty and `.` segments, keeps `..` verbatim, keeps a leading `/`.
fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Splits an `s3://bucket/key` address into bucket and key.
///
/// The bucket is the third `/`-separated token; the key is everything after
/// it, rejoined with `/`. The key may be empty.
///
/// # Errors
///
/// Returns [`AddressError::MissingBucket`] when the bucket token is absent or
/// empty.
pub fn extract_object_info(address: &str) -> Result<(String, String), AddressError> {
    let tokens: Vec<&str> = address.split('/').collect();

    match tokens.get(2) {
        Some(bucket) if !bucket.is_empty() => Ok((bucket.to_string(), tokens[3..].join("/"))),
        _ => Err(AddressError::MissingBucket(address.to_string())),
    }
}

/// Final path segment of an address, used as the default local file name.
pub fn display_name(address: &str) -> String {
    match address.rsplit('/').next() {
        Some(".") | None => String::new(),
        Some(name) => name.to_string(),
    }
}

/// Checks that `name` can be joined onto a directory without leaving it.
///
/// Accepts exactly one normal path segment: rejects empty names, `.`, `..`,
/// absolute paths and anything containing a separator.
///
/// # Errors
///
/// Returns [`AddressError::InvalidFileName`] for anything else.
pub fn validate_file_name(name: &str) -> Result<&str, AddressError> {
    let mut components = Path::new(name).components();
    let single_segment = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == name
    );

    if single_segment && !name.contains(['/', '\\']) {
        Ok(name)
    } else {
        Err(AddressError::InvalidFileName(name.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
