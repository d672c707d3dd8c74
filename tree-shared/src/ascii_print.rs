//! ASCII tree printer.
//!
//! Renders a tree depth-first, one line per node, handing each line's
//! prefix and payload to a caller-supplied callback:
//!
//! ```text
//! root
//! |-- a
//! `-- b
//!     `-- c
//! ```

use std::fmt::Display;

use crate::node::Node;

/// Default width of the horizontal branch line.
pub const DEFAULT_INDENT: usize = 2;

/// Default padding between the branch line and the payload.
pub const DEFAULT_PAD: usize = 1;

/// Prefix segments shared by every line of one print run.
struct TreePrinter {
    branch: String,
    vline: String,
    corner: String,
    filler: String,
}

impl TreePrinter {
    fn new(indent: usize, pad: usize) -> Self {
        let width = 1 + indent + pad;
        let line = "-".repeat(indent);
        let padding = " ".repeat(pad);

        Self {
            branch: format!("|{line}{padding}"),
            vline: format!("|{}", " ".repeat(width - 1)),
            corner: format!("`{line}{padding}"),
            filler: " ".repeat(width),
        }
    }

    fn print<D, F>(&self, emit: &mut F, node: &Node<D>, base: &str, own: &str, continuation: &str)
    where
        F: FnMut(&str, &D),
    {
        let prefix = format!("{base}{own}");
        emit(&prefix, &node.data);

        let Some((last, rest)) = node.children.split_last() else {
            return;
        };

        let child_base = format!("{base}{continuation}");
        for child in rest {
            self.print(emit, child, &child_base, &self.branch, &self.vline);
        }
        self.print(emit, last, &child_base, &self.corner, &self.filler);
    }
}

/// Print `tree` depth-first, calling `emit(prefix, data)` once per node.
///
/// `indent` is the length of the horizontal branch line and `pad` the
/// number of spaces between it and the payload.
pub fn print_ascii_tree<D, F>(tree: &Node<D>, indent: usize, pad: usize, mut emit: F)
where
    F: FnMut(&str, &D),
{
    TreePrinter::new(indent, pad).print(&mut emit, tree, "", "", "");
}

/// [`print_ascii_tree`] with the default indent and pad.
pub fn print_ascii_tree_default<D, F>(tree: &Node<D>, emit: F)
where
    F: FnMut(&str, &D),
{
    print_ascii_tree(tree, DEFAULT_INDENT, DEFAULT_PAD, emit);
}

/// Render the tree into owned lines of `prefix + data`.
pub fn render_ascii_tree<D: Display>(tree: &Node<D>, indent: usize, pad: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.node_count());
    print_ascii_tree(tree, indent, pad, |prefix, data| {
        lines.push(format!("{prefix}{data}"));
    });
    lines
}
