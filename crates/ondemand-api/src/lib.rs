//! API client library for the NHK radio on-demand index.
//!
//! Fetches the program index and per-program detail documents, and
//! flattens them into 13-column tab-separated records.

/// Structured error type shared by the client and the CLI.
pub mod error;

/// NHK radio on-demand client, data model, filter and flattener.
pub mod nhk;

pub use error::{ErrorKind, OnDemandError};
