//! CLI command implementations.

pub mod cat;
pub mod classify;
pub mod config;
pub mod copy;
