//! Fetch error types.
//!
//! This module defines the single error kind the collector recognizes: a failed
//! fetch of a node's extended data, whatever its cause.

use std::io;

use thiserror::Error;

/// Errors that can occur while fetching data for a key.
///
/// The collector records the first of these it observes and hands a copy of it to
/// every pending reply of the same request, so the type is `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request deadline expired before the fetch completed.
    #[error("Deadline expired")]
    Timeout,

    /// The requested key does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O failure while producing the data.
    #[error("IO error: {0}")]
    Io(String),

    /// Provider-specific failure.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The background worker running the fetch panicked or was shut down.
    #[error("Worker error: {0}")]
    Worker(String),

    /// The request was dropped before a reply could be produced.
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a worker error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Whether this error was caused by deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<io::Error> for FetchError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}
