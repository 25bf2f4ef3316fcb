//! Compressed suffix tree built online in linear time with Ukkonen's
//! algorithm.
//!
//! The tree contains every suffix of the input as a root-to-leaf path
//! (implicitly, since no sentinel terminator is appended), supports
//! substring queries in time proportional to the query length, and exposes
//! its full structure — nodes, edge labels, parents, suffix links — for
//! external traversal and visualization.
//!
//! # Example
//! ```
//! use ukkonen::tree::SuffixTree;
//!
//! let mut tree = SuffixTree::new("abcabxabcd");
//! tree.build().unwrap();
//!
//! assert!(tree.find("bxa").unwrap());
//! assert!(!tree.find("bcx").unwrap());
//! ```

pub mod error;
pub mod tree;

// Re-export the tree module at the root level
pub use tree::*;
// Re-export error types
pub use error::*;
