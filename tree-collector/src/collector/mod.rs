//! Tree collector implementation.
//!
//! Collects a tree from a root key by fetching each node's extended data, discovering
//! its children from that data and recursing into every child concurrently.
//!
//! Per node:
//!
//! 1. The extended data is fetched through the request's deadline-bound provider
//! 2. A [`CompletionTrigger`] is created whose callback replies for the node
//! 3. One collection is spawned per child, each holding a clone of the trigger
//!    until it has replied
//! 4. The payload is reduced from the extended data and the initial holder released
//!
//! The callback therefore runs once the payload is ready and every child subtree has
//! replied, and sorts the gathered children back into enumeration order.

mod context;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::completion::CompletionTrigger;
use crate::config::CollectorConfig;
use crate::deadline::Deadline;
use crate::errors::FetchError;
use crate::handlers::DeadlineRequestHandler;
use crate::interfaces::RequestHandler;
use context::RequestContext;
use tree_shared::Node;

/// Calls the supplied callback once per child key found in the extended data, in order.
///
/// Receives the parent's key so that child keys can be derived from it.
pub type ChildEnumerator<K, E> = dyn Fn(&K, &E, &mut dyn FnMut(K)) + Send + Sync;

/// Consumes the extended data of a node and produces the payload stored in the tree.
pub type DataReducer<E, D> = dyn Fn(E) -> D + Send + Sync;

type Reply<D> = Box<dyn FnOnce(Result<Node<D>, FetchError>) + Send>;

/// A completed child subtree tagged with its enumeration index.
type ChildSlot<D> = (usize, Node<D>);

/// Immutable configuration shared by every pending node of every request.
struct CollectorShared<K, E, D> {
    provider: Arc<dyn RequestHandler<K, E>>,
    for_each_child: Box<ChildEnumerator<K, E>>,
    reduce: Box<DataReducer<E, D>>,
}

/// Collector that assembles a tree of reduced node payloads from a root key.
///
/// The collector:
/// - Issues one fetch per discovered key, concurrently and without a width or depth limit
/// - Bounds every fetch of a request with one deadline computed when the request starts
/// - Replies exactly once, with either the complete tree or the first failure observed
/// - Stops issuing new fetches once a request has failed, while awaiting in-flight ones
pub struct TreeCollector<K, E, D> {
    shared: Arc<CollectorShared<K, E, D>>,
    config: CollectorConfig,
}

impl<K, E, D> TreeCollector<K, E, D>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Send + 'static,
    D: Send + 'static,
{
    /// Create a new collector with default configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - Fetches the extended data of a single key
    /// * `for_each_child` - Enumerates child keys of a node from its extended data
    /// * `reduce` - Turns extended data into the payload stored in the tree
    pub fn new<C, R>(provider: Arc<dyn RequestHandler<K, E>>, for_each_child: C, reduce: R) -> Self
    where
        C: Fn(&K, &E, &mut dyn FnMut(K)) + Send + Sync + 'static,
        R: Fn(E) -> D + Send + Sync + 'static,
    {
        Self::with_config(provider, for_each_child, reduce, CollectorConfig::unbounded())
    }

    /// Create a new collector with custom configuration.
    pub fn with_config<C, R>(
        provider: Arc<dyn RequestHandler<K, E>>,
        for_each_child: C,
        reduce: R,
        config: CollectorConfig,
    ) -> Self
    where
        C: Fn(&K, &E, &mut dyn FnMut(K)) + Send + Sync + 'static,
        R: Fn(E) -> D + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(CollectorShared {
                provider,
                for_each_child: Box::new(for_each_child),
                reduce: Box::new(reduce),
            }),
            config,
        }
    }

    /// Collect the tree rooted at `root`.
    ///
    /// `timeout` is relative to now and bounds the whole request; `Duration::MAX`
    /// never expires.
    ///
    /// # Returns
    ///
    /// * `Ok(Node<D>)` - The complete tree, children in enumeration order
    /// * `Err(FetchError)` - The first fetch failure observed anywhere in the tree
    #[instrument(skip(self))]
    pub async fn collect(&self, root: K, timeout: Duration) -> Result<Node<D>, FetchError> {
        let started = Instant::now();
        let deadline = Deadline::after(started, timeout);
        let ctx = Arc::new(RequestContext::new(DeadlineRequestHandler::new(
            Arc::clone(&self.shared.provider),
            deadline,
        )));

        debug!(unbounded = ctx.deadline().is_unbounded(), "Starting tree collection");

        let (tx, rx) = oneshot::channel();
        CollectorShared::collect_node(
            &self.shared,
            root,
            Arc::clone(&ctx),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );

        let result = rx.await.unwrap_or(Err(FetchError::Cancelled));

        match &result {
            Ok(tree) => info!(
                nodes = tree.node_count(),
                fetches = ctx.fetch_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Tree collected"
            ),
            Err(e) => warn!(
                error = %e,
                fetches = ctx.fetch_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Tree collection failed"
            ),
        }

        result
    }

    /// Collect the tree rooted at `root` with the configured default timeout.
    pub async fn collect_with_default_timeout(&self, root: K) -> Result<Node<D>, FetchError> {
        self.collect(root, self.config.default_timeout).await
    }
}

impl<K, E, D> CollectorShared<K, E, D>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Send + 'static,
    D: Send + 'static,
{
    /// Collect the subtree at `key`, eventually calling `reply` exactly once.
    fn collect_node(
        this: &Arc<Self>,
        key: K,
        ctx: Arc<RequestContext<K, E>>,
        reply: Reply<D>,
    ) {
        if let Some(err) = ctx.first_error() {
            debug!(key = ?key, "Request already failed, not fetching");
            tokio::spawn(async move {
                reply(Err(err));
            });
            return;
        }

        let this = Arc::clone(this);
        tokio::spawn(async move {
            ctx.count_fetch();
            match ctx.provider().handle_request(key.clone(), Duration::MAX).await {
                Ok(ext_data) => this.fan_out(key, ext_data, ctx, reply),
                Err(err) => {
                    if ctx.record_error(&err) {
                        warn!(key = ?key, error = %err, "Fetch failed, failing request");
                    } else {
                        debug!(key = ?key, error = %err, "Fetch failed after request already failed");
                    }
                    reply(Err(err));
                }
            }
        });
    }

    /// Spawn child collections for a fetched node and arm its completion trigger.
    fn fan_out(self: &Arc<Self>, key: K, ext_data: E, ctx: Arc<RequestContext<K, E>>, reply: Reply<D>) {
        let slots: Arc<Mutex<Vec<ChildSlot<D>>>> = Arc::new(Mutex::new(Vec::new()));
        let payload: Arc<Mutex<Option<D>>> = Arc::new(Mutex::new(None));

        let trigger = {
            let ctx = Arc::clone(&ctx);
            let slots = Arc::clone(&slots);
            let payload = Arc::clone(&payload);
            CompletionTrigger::new(move || {
                let result = match ctx.first_error() {
                    Some(err) => Err(err),
                    None => {
                        let data = payload.lock().take();
                        let children = std::mem::take(&mut *slots.lock());
                        // No payload means the reducer never returned.
                        data.map(|data| assemble_node(data, children))
                            .ok_or(FetchError::Cancelled)
                    }
                };
                reply(result);
            })
        };

        let mut child_count = 0usize;
        (self.for_each_child)(&key, &ext_data, &mut |child_key: K| {
            let child_index = child_count;
            child_count += 1;

            let slots = Arc::clone(&slots);
            let holder = trigger.clone();
            Self::collect_node(
                self,
                child_key,
                Arc::clone(&ctx),
                Box::new(move |result| {
                    if let Ok(child) = result {
                        slots.lock().push((child_index, child));
                    }
                    holder.release();
                }),
            );
        });

        debug!(key = ?key, children = child_count, "Node fetched");

        *payload.lock() = Some((self.reduce)(ext_data));
        trigger.release();
    }
}

/// Build a node from its payload and the children gathered in completion order.
fn assemble_node<D>(data: D, mut slots: Vec<ChildSlot<D>>) -> Node<D> {
    slots.sort_unstable_by_key(|(index, _)| *index);
    Node::new(data, slots.into_iter().map(|(_, child)| child).collect())
}

#[async_trait]
impl<K, E, D> RequestHandler<K, Node<D>> for TreeCollector<K, E, D>
where
    K: Clone + Debug + Send + Sync + 'static,
    E: Send + 'static,
    D: Send + 'static,
{
    async fn handle_request(&self, request: K, timeout: Duration) -> Result<Node<D>, FetchError> {
        self.collect(request, timeout).await
    }
}
