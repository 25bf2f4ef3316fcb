//! Graphviz export of the tree structure.
//!
//! The output is a plain DOT digraph: one node per id, tree edges labeled
//! with their edge substrings (open leaf edges resolved against the global
//! end), and suffix links drawn dashed. Feed it to `dot -Tsvg` or any
//! graphviz viewer to inspect a tree.

use std::fmt::Write;

use crate::tree::node::ROOT;
use crate::tree::suffix_tree::SuffixTree;

impl SuffixTree {
    /// Renders the tree in graphviz DOT format.
    ///
    /// Works on built and unbuilt trees alike; an unbuilt tree renders as
    /// the lone root.
    ///
    /// # Example
    /// ```
    /// use ukkonen::tree::SuffixTree;
    ///
    /// let mut tree = SuffixTree::new("banana");
    /// tree.build().unwrap();
    /// let dot = tree.to_dot();
    /// assert!(dot.starts_with("digraph"));
    /// ```
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph suffix_tree {\n");
        out.push_str("    rankdir=LR;\n");

        for (id, _) in self.nodes() {
            let _ = writeln!(out, "    n{id};");
        }
        for (id, node) in self.nodes() {
            for &child in node.children().values() {
                let label = escape(&self.edge_label(child));
                let _ = writeln!(out, "    n{id} -> n{child} [label=\"{label}\"];");
            }
            if id != ROOT {
                if let Some(link) = node.suffix_link() {
                    let _ = writeln!(out, "    n{id} -> n{link} [style=dashed];");
                }
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
