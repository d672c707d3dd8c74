//! Runtime settings for the directory walker.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::AppError;

/// Default directory to walk.
const DEFAULT_ROOT: &str = ".";

/// Default number of directories listed at the same time.
const DEFAULT_WORKERS: usize = 1;

/// Default width of the branch line in ASCII output.
const DEFAULT_INDENT: usize = 2;

/// Default padding between branch line and name in ASCII output.
const DEFAULT_PAD: usize = 1;

/// How the collected tree is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ascii,
    Json,
}

/// Settings for one walk.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the walk starts from.
    pub root: String,
    /// Timeout for the whole walk; `Duration::MAX` when unbounded.
    pub timeout: Duration,
    /// Maximum number of directories listed concurrently.
    pub workers: usize,
    pub indent: usize,
    pub pad: usize,
    pub output: OutputFormat,
    /// Sort siblings by name before rendering.
    pub sort: bool,
    /// Descend into symbolic links to directories.
    pub follow_links: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            timeout: Duration::MAX,
            workers: DEFAULT_WORKERS,
            indent: DEFAULT_INDENT,
            pad: DEFAULT_PAD,
            output: OutputFormat::Ascii,
            sort: true,
            follow_links: false,
        }
    }
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DIR_TREE_ROOT`: Directory to walk (default: .)
    /// - `DIR_TREE_TIMEOUT_MS`: Timeout for the whole walk in milliseconds (default: none)
    /// - `DIR_TREE_WORKERS`: Concurrent directory listings (default: 1)
    /// - `DIR_TREE_FOLLOW_LINKS`: Descend into symlinked directories (default: false)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Self::default();

        if let Some(root) = lookup("DIR_TREE_ROOT") {
            settings.root = root;
        }
        if let Some(timeout_ms) = lookup("DIR_TREE_TIMEOUT_MS") {
            settings.timeout = Duration::from_millis(parse_var("DIR_TREE_TIMEOUT_MS", &timeout_ms)?);
        }
        if let Some(workers) = lookup("DIR_TREE_WORKERS") {
            settings.workers = parse_var("DIR_TREE_WORKERS", &workers)?;
        }
        if let Some(follow_links) = lookup("DIR_TREE_FOLLOW_LINKS") {
            settings.follow_links = parse_var("DIR_TREE_FOLLOW_LINKS", &follow_links)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check settings for values the walker cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.root.is_empty() {
            return Err(AppError::config("root directory must not be empty"));
        }
        if self.workers == 0 {
            return Err(AppError::config("workers must be at least 1"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("invalid value for {}: {:?}", name, value)))
}
