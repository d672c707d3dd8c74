//! Tree node representation for collected trees
//!
//! A node exclusively owns its children. Trees are assembled bottom-up,
//! so a parent is only built once every child subtree is complete.

use serde::{Deserialize, Serialize};

/// A node in a collected tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<D> {
    /// Payload stored for this node
    pub data: D,

    /// Children of this node, in order
    pub children: Vec<Node<D>>,
}

impl<D> Node<D> {
    /// Create a node from its payload and an already assembled list of children
    pub fn new(data: D, children: Vec<Node<D>>) -> Self {
        Self { data, children }
    }

    /// Create a node without children
    pub fn leaf(data: D) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    /// Builder-style variant of [`Node::new`]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node<D>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node<D>) {
        self.children.push(child);
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Count total nodes in this subtree (including self)
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Number of levels in this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Payloads in depth-first pre-order
    pub fn iter_data(&self) -> Vec<&D> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_data(&mut out);
        out
    }

    fn collect_data<'a>(&'a self, out: &mut Vec<&'a D>) {
        out.push(&self.data);
        for child in &self.children {
            child.collect_data(out);
        }
    }
}
