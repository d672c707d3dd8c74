//! Threaded request handler.
//!
//! Runs a blocking function on tokio's blocking thread pool so that filesystem or
//! CPU-bound work never stalls the runtime. The result is handed back to the awaiting
//! task through the join handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::config::WorkerPoolConfig;
use crate::errors::FetchError;
use crate::interfaces::RequestHandler;

type BlockingWork<Req, Resp> = dyn Fn(Req, Duration) -> Result<Resp, FetchError> + Send + Sync;

/// Request handler backed by a blocking function.
///
/// At most `max_workers` invocations run at once; further requests wait for a free
/// worker before being dispatched.
pub struct ThreadedRequestHandler<Req, Resp> {
    work: Arc<BlockingWork<Req, Resp>>,
    workers: Arc<Semaphore>,
}

impl<Req, Resp> ThreadedRequestHandler<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Create a handler with the default worker pool configuration.
    pub fn new<F>(work: F) -> Self
    where
        F: Fn(Req, Duration) -> Result<Resp, FetchError> + Send + Sync + 'static,
    {
        Self::with_config(WorkerPoolConfig::default(), work)
    }

    /// Create a handler with a custom worker pool configuration.
    pub fn with_config<F>(config: WorkerPoolConfig, work: F) -> Self
    where
        F: Fn(Req, Duration) -> Result<Resp, FetchError> + Send + Sync + 'static,
    {
        Self {
            work: Arc::new(work),
            workers: Arc::new(Semaphore::new(config.max_workers.max(1))),
        }
    }
}

#[async_trait]
impl<Req, Resp> RequestHandler<Req, Resp> for ThreadedRequestHandler<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn handle_request(&self, request: Req, timeout: Duration) -> Result<Resp, FetchError> {
        let permit = self
            .workers
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FetchError::Cancelled)?;

        let work = Arc::clone(&self.work);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work(request, timeout)
        });

        match handle.await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(e)) => {
                debug!(error = %e, "Blocking work returned an error");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Blocking worker failed");
                Err(FetchError::worker(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_runs_blocking_work() {
        let handler = ThreadedRequestHandler::new(|n: u32, _timeout| Ok(n * 2));

        assert_eq!(handler.handle_request(21, Duration::MAX).await, Ok(42));
    }

    #[tokio::test]
    async fn test_propagates_work_error() {
        let handler: ThreadedRequestHandler<u32, u32> =
            ThreadedRequestHandler::new(|n: u32, _timeout| Err(FetchError::not_found(n.to_string())));

        assert_eq!(
            handler.handle_request(5, Duration::MAX).await,
            Err(FetchError::not_found("5"))
        );
    }

    #[tokio::test]
    async fn test_panicking_work_is_worker_error() {
        let handler: ThreadedRequestHandler<u32, u32> =
            ThreadedRequestHandler::new(|_n, _timeout| panic!("worker exploded"));

        let result = handler.handle_request(1, Duration::MAX).await;

        assert!(matches!(result, Err(FetchError::Worker(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_worker_limit_is_respected() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handler = {
            let running = running.clone();
            let peak = peak.clone();
            Arc::new(ThreadedRequestHandler::with_config(
                WorkerPoolConfig::with_max_workers(1),
                move |n: u32, _timeout| {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(n)
                },
            ))
        };

        let (a, b, c) = tokio::join!(
            handler.handle_request(1, Duration::MAX),
            handler.handle_request(2, Duration::MAX),
            handler.handle_request(3, Duration::MAX),
        );

        assert_eq!((a, b, c), (Ok(1), Ok(2), Ok(3)));
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_forwarded() {
        let handler = ThreadedRequestHandler::new(|_n: u32, timeout| Ok(timeout));

        assert_eq!(
            handler.handle_request(0, Duration::from_secs(3)).await,
            Ok(Duration::from_secs(3))
        );
    }
}
