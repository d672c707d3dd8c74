//! # Tree Collector
//!
//! Asynchronously collects a tree from a single root key.
//!
//! ## Architecture
//!
//! Collection follows a scatter/gather pattern:
//!
//! 1. **Fetch**: the extended data of a node is requested through a [`RequestHandler`]
//! 2. **Enumerate**: child keys are discovered from the fetched data
//! 3. **Recurse**: one collection is started per child, concurrently
//! 4. **Gather**: a [`CompletionTrigger`] fires once the node's payload is reduced and
//!    every child has replied, assembling the node in enumeration order
//!
//! A single [`Deadline`] computed at the top of a request bounds every fetch at every
//! depth. The first failure observed anywhere in the tree becomes the request's error and
//! stops new fetches from being issued.

pub mod collector;
pub mod completion;
pub mod config;
pub mod deadline;
pub mod errors;
pub mod handlers;
pub mod interfaces;

pub use collector::TreeCollector;
pub use completion::CompletionTrigger;
pub use config::{CollectorConfig, WorkerPoolConfig};
pub use deadline::Deadline;
pub use errors::FetchError;
pub use handlers::{DeadlineRequestHandler, ThreadedRequestHandler};
pub use interfaces::RequestHandler;
pub use tree_shared::Node;
