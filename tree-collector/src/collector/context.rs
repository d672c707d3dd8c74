//! Per-request state shared by every node of one collection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::deadline::Deadline;
use crate::errors::FetchError;
use crate::handlers::DeadlineRequestHandler;

/// State of one top-level request.
///
/// Created when a request starts and dropped once its reply is delivered and no
/// spawned work refers to it anymore.
pub(crate) struct RequestContext<K, E> {
    first_error: OnceLock<FetchError>,
    provider: DeadlineRequestHandler<K, E>,
    fetches: AtomicUsize,
}

impl<K, E> RequestContext<K, E>
where
    K: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(provider: DeadlineRequestHandler<K, E>) -> Self {
        Self {
            first_error: OnceLock::new(),
            provider,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fetcher bound to this request's deadline.
    pub(crate) fn provider(&self) -> &DeadlineRequestHandler<K, E> {
        &self.provider
    }

    pub(crate) fn deadline(&self) -> Deadline {
        self.provider.deadline()
    }

    pub(crate) fn first_error(&self) -> Option<FetchError> {
        self.first_error.get().cloned()
    }

    /// Record `err` unless an earlier failure was already recorded.
    ///
    /// Returns whether `err` became the request's error.
    pub(crate) fn record_error(&self, err: &FetchError) -> bool {
        self.first_error.set(err.clone()).is_ok()
    }

    pub(crate) fn count_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}
