//! Dependency initialization and wiring for the directory walker.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::dir_info::{for_each_sub_dir, into_name, read_dir_info, DirInfo};
use crate::AppError;
use tree_collector::{
    CollectorConfig, RequestHandler, ThreadedRequestHandler, TreeCollector, WorkerPoolConfig,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Collector producing the directory tree, payloads are directory names.
    pub collector: TreeCollector<PathBuf, DirInfo, String>,
    pub settings: Settings,
}

impl Dependencies {
    /// Wire the directory listing provider and collector from `settings`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the settings are invalid
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;

        info!(
            root = %settings.root,
            workers = settings.workers,
            follow_links = settings.follow_links,
            timeout_ms = ?timeout_ms(&settings),
            "Initializing dependencies"
        );

        let follow_links = settings.follow_links;
        let provider: Arc<dyn RequestHandler<PathBuf, DirInfo>> =
            Arc::new(ThreadedRequestHandler::with_config(
                WorkerPoolConfig::with_max_workers(settings.workers),
                move |path: PathBuf, _timeout| read_dir_info(&path, follow_links),
            ));

        let collector = TreeCollector::with_config(
            provider,
            for_each_sub_dir,
            into_name,
            CollectorConfig::with_timeout(settings.timeout),
        );

        Ok(Self {
            collector,
            settings,
        })
    }
}

/// Timeout for logging; `None` when unbounded.
fn timeout_ms(settings: &Settings) -> Option<u64> {
    (settings.timeout != std::time::Duration::MAX).then(|| settings.timeout.as_millis() as u64)
}
