// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # s3reader Core
//!
//! Core types and traits shared by the s3reader crates.
//!
//! - [`Address`] and [`classify`] - parse and route an input address
//! - [`AddressError`], [`ClientError`] - error types
//! - [`ClientOptions`], [`RetryMode`] - credential and session settings
//! - [`ClientFactory`], [`ObjectStoreClient`] - the credentialed client seam

pub mod address;
pub mod error;
pub mod options;
pub mod traits;

pub use address::{
    Address, classify, display_name, extract_object_info, normalize, validate_file_name,
};
pub use error::{AddressError, ClientError};
pub use options::{ClientOptions, RetryMode};
pub use traits::{ClientFactory, ObjectStoreClient};
