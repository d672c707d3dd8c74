//! # Dir Tree
//!
//! Directory walker built on the tree collector.
//!
//! Each directory is listed on a background worker, its sub-directories become
//! the node's children, and the collected tree is sorted by name and rendered
//! as ASCII or JSON.

pub mod config;
pub mod dir_info;
pub mod walker;

pub use config::{Dependencies, OutputFormat, Settings};
pub use walker::{render, run, write_output};

use thiserror::Error;
use tree_collector::FetchError;

/// Errors that can occur while walking and rendering a directory tree.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Tree collection error.
    #[error("{0}")]
    CollectError(#[from] FetchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
