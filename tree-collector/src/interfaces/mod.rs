//! Interfaces consumed and produced by the tree collector.

mod request_handler;

pub use request_handler::RequestHandler;
