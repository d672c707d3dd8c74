//! # Tree Shared
//!
//! Shared tree types and post-processing utilities.
//!
//! - [`Node`]: a recursive node owning its payload and ordered children
//! - [`sort_recursively`] / [`sort_recursively_by`]: stable sibling reordering at every level
//! - [`print_ascii_tree`]: box-drawing style rendering through a line callback

pub mod ascii_print;
pub mod node;
pub mod sort;

pub use ascii_print::{print_ascii_tree, print_ascii_tree_default, render_ascii_tree};
pub use node::Node;
pub use sort::{sort_recursively, sort_recursively_by};
