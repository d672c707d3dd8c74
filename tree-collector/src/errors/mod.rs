//! Error types for the tree collector.

mod fetch_error;

pub use fetch_error::FetchError;
