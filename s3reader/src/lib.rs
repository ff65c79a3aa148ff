// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # s3reader
//!
//! Treat `s3://` objects and `http(s)://` URLs as ordinary local files.
//!
//! A [`File`] classifies its address, downloads remote content into a private
//! temp directory, and deletes that directory when closed or dropped. Local
//! paths pass through untouched.
//!
//! ## Usage
//!
//! ```ignore
//! use s3reader::File;
//!
//! let file = File::builder("s3://my-bucket/data/file.csv")
//!     .max_trials(5)
//!     .open()?;
//! let text = std::fs::read_to_string(file.path())?;
//! // temp directory removed here
//! drop(file);
//! ```
//!
//! Object-store downloads need a [`ClientFactory`]. With the `aws` feature
//! the default factory talks to S3; otherwise supply your own through
//! [`FileBuilder::client_factory`].

pub mod config;
pub mod error;
pub mod file;

pub use config::Config;
pub use error::ConfigError;
pub use file::{File, FileBuilder, FileState};

pub use s3reader_core::{
    Address, AddressError, ClientError, ClientFactory, ClientOptions, ObjectStoreClient, RetryMode,
    classify,
};
pub use s3reader_fetch::{FetchContext, FetchError, RetryPolicy};
