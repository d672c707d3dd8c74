//! Deadline-setting request handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::deadline::Deadline;
use crate::errors::FetchError;
use crate::interfaces::RequestHandler;

/// Wraps a request handler with a fixed absolute deadline.
///
/// Each call is bounded by the earlier of the fixed deadline and the call's own
/// relative timeout. Expiry is reported as [`FetchError::Timeout`]. A call made after
/// the deadline has passed fails without reaching the wrapped handler.
pub struct DeadlineRequestHandler<Req, Resp> {
    inner: Arc<dyn RequestHandler<Req, Resp>>,
    deadline: Deadline,
}

impl<Req, Resp> DeadlineRequestHandler<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Create a new handler bound to `deadline`.
    pub fn new(inner: Arc<dyn RequestHandler<Req, Resp>>, deadline: Deadline) -> Self {
        Self { inner, deadline }
    }

    /// The fixed deadline enforced by this handler.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }
}

#[async_trait]
impl<Req, Resp> RequestHandler<Req, Resp> for DeadlineRequestHandler<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn handle_request(&self, request: Req, timeout: Duration) -> Result<Resp, FetchError> {
        let now = Instant::now();
        let deadline = self.deadline.earliest(Deadline::after(now, timeout));

        if deadline.is_expired(now) {
            debug!("Deadline already expired, not forwarding request");
            return Err(FetchError::Timeout);
        }

        let call = self.inner.handle_request(request, deadline.remaining(now));
        match deadline.instant() {
            Some(at) => tokio::time::timeout_at(at, call)
                .await
                .map_err(|_| FetchError::Timeout)?,
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock handler that answers after a fixed delay.
    struct DelayedEcho {
        delay: Duration,
        calls: AtomicUsize,
        last_timeout: parking_lot::Mutex<Option<Duration>>,
    }

    impl DelayedEcho {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                calls: AtomicUsize::new(0),
                last_timeout: parking_lot::Mutex::new(None),
            })
        }
    }

    fn wrap(inner: &Arc<DelayedEcho>, deadline: Deadline) -> DeadlineRequestHandler<u32, u32> {
        DeadlineRequestHandler::new(inner.clone(), deadline)
    }

    #[async_trait]
    impl RequestHandler<u32, u32> for DelayedEcho {
        async fn handle_request(&self, request: u32, timeout: Duration) -> Result<u32, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_timeout.lock() = Some(timeout);
            tokio::time::sleep(self.delay).await;
            Ok(request)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_before_deadline() {
        let inner = DelayedEcho::new(Duration::from_millis(10));
        let handler = wrap(&inner, Deadline::from_now(Duration::from_millis(50)));

        let result = handler.handle_request(7, Duration::MAX).await;

        assert_eq!(result, Ok(7));
        assert_eq!(*inner.last_timeout.lock(), Some(Duration::from_millis(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_at_fixed_deadline() {
        let inner = DelayedEcho::new(Duration::from_millis(100));
        let handler = wrap(&inner, Deadline::from_now(Duration::from_millis(50)));

        let result = handler.handle_request(7, Duration::MAX).await;

        assert_eq!(result, Err(FetchError::Timeout));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_call_timeout_tightens_deadline() {
        let inner = DelayedEcho::new(Duration::from_millis(30));
        let handler = wrap(&inner, Deadline::UNBOUNDED);

        let result = handler.handle_request(7, Duration::from_millis(20)).await;

        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_skips_inner_handler() {
        let inner = DelayedEcho::new(Duration::from_millis(1));
        let handler = wrap(&inner, Deadline::from_now(Duration::ZERO));

        let result = handler.handle_request(7, Duration::MAX).await;

        assert_eq!(result, Err(FetchError::Timeout));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_shared_across_calls() {
        let inner = DelayedEcho::new(Duration::from_millis(30));
        let handler = wrap(&inner, Deadline::from_now(Duration::from_millis(50)));

        assert_eq!(handler.handle_request(1, Duration::MAX).await, Ok(1));
        // 30ms already spent, only 20ms remain for the second call
        assert_eq!(
            handler.handle_request(2, Duration::MAX).await,
            Err(FetchError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_unbounded_deadline_passes_unbounded_timeout() {
        let inner = DelayedEcho::new(Duration::ZERO);
        let handler = wrap(&inner, Deadline::UNBOUNDED);

        assert_eq!(handler.handle_request(3, Duration::MAX).await, Ok(3));
        assert_eq!(*inner.last_timeout.lock(), Some(Duration::MAX));
    }
}
