//! Configuration types for the tree collector.

use std::time::Duration;

/// Configuration for the TreeCollector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Timeout applied by `collect_with_default_timeout`.
    /// `Duration::MAX` means the request is never timed out.
    pub default_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::MAX,
        }
    }
}

impl CollectorConfig {
    /// Create a config with no timeout.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create a config with a custom default timeout.
    pub fn with_timeout(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

/// Configuration for the ThreadedRequestHandler.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Maximum number of blocking calls running at the same time.
    pub max_workers: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self { max_workers: 1 }
    }
}

impl WorkerPoolConfig {
    /// Create a config with a custom worker limit. Zero is treated as one.
    pub fn with_max_workers(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }
}
