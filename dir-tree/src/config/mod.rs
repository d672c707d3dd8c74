//! Configuration and dependency wiring for the directory walker.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{OutputFormat, Settings};
