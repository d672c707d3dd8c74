//! Recursive stable sorting of tree children.

use std::cmp::Ordering;

use crate::node::Node;

/// Stably sort the children of every node in the tree by their payload's natural order.
pub fn sort_recursively<D: Ord>(tree: &mut Node<D>) {
    sort_recursively_by(tree, D::cmp);
}

/// Stably sort the children of every node in the tree with `compare` applied to payloads.
///
/// Only sibling order changes; parent/child relationships are untouched.
pub fn sort_recursively_by<D, F>(tree: &mut Node<D>, mut compare: F)
where
    F: FnMut(&D, &D) -> Ordering,
{
    sort_level(tree, &mut compare);
}

fn sort_level<D, F>(tree: &mut Node<D>, compare: &mut F)
where
    F: FnMut(&D, &D) -> Ordering,
{
    // slice::sort_by is stable
    tree.children.sort_by(|a, b| compare(&a.data, &b.data));

    for child in &mut tree.children {
        sort_level(child, compare);
    }
}
