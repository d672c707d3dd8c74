//! Request handler decorators and adapters.
//!
//! - [`DeadlineRequestHandler`]: enforces one fixed absolute deadline over every call
//! - [`ThreadedRequestHandler`]: runs blocking work off the runtime's worker threads

mod deadline_handler;
mod threaded_handler;

pub use deadline_handler::DeadlineRequestHandler;
pub use threaded_handler::ThreadedRequestHandler;
