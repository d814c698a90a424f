//! An ordered map implemented with an AVL tree.
//!
//! [`BalancedTree`] stores unique keys in a binary search tree and keeps the
//! heights of every node's two subtrees within one of each other. Inserts,
//! removes and lookups run in O(log n).
//!
//! ```
//! use balanced_tree::BalancedTree;
//! let mut tree = BalancedTree::new();
//! for key in [10, 20, 30] {
//!     tree.insert(key, key * 2).unwrap();
//! }
//! // Inserting in ascending order triggered a left rotation
//! assert_eq!(tree.root(), Some((&20, &40)));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [10, 20, 30]);
//! ```
//!
//! Mutations never fail silently. Every rejected operation reports a
//! [`TreeError`] and leaves the tree untouched.

mod balance;
mod bst;
mod error;
pub mod iter;
mod tree;

pub use error::{Result, TreeError};
pub use tree::BalancedTree;

#[cfg(test)]
mod proptests;
