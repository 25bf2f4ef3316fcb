pub mod dot;
pub mod node;
pub mod suffix_tree;

// Re-export the core types
pub use node::*;
pub use suffix_tree::*;
