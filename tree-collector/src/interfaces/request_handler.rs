//! Request handler trait definition.
//!
//! This module defines the asynchronous request/response capability the collector
//! consumes for per-node fetches, and which the collector itself implements.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FetchError;

/// Abstracts an asynchronous request/response operation bounded by a timeout.
///
/// Implementations are injected into the collector as `Arc<dyn RequestHandler<_, _>>`,
/// which allows wrapping them in decorators such as
/// [`DeadlineRequestHandler`](crate::DeadlineRequestHandler) and replacing them with
/// mock implementations in tests.
#[async_trait]
pub trait RequestHandler<Req, Resp>: Send + Sync
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Handle a single request.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to handle
    /// * `timeout` - Time budget relative to now; `Duration::MAX` means unbounded
    ///
    /// # Returns
    ///
    /// * `Ok(Resp)` - If the request succeeded
    /// * `Err(FetchError::Timeout)` - If the time budget was exhausted
    /// * `Err(FetchError)` - If the request failed for any other reason
    async fn handle_request(&self, request: Req, timeout: Duration) -> Result<Resp, FetchError>;
}

