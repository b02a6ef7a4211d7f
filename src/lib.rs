//! This crate exposes a Binary Search Tree (BST) whose nodes know their parent,
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than or equal to its own key. Inserting a key that is already
//!    present stores it again, to the right.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as
//! the longest path from the root `Node` to a leaf `Node`). This tree does no
//! balancing, so inserting keys in sorted order degrades it into a linked list
//! with a height of `N`.
//!
//! ## Parent links
//!
//! Each [`Node`] also points back at its parent. That makes walking to the
//! in-order neighbour of a node possible without a stack: if a node has no
//! subtree on the relevant side, the neighbour is found by climbing. Parent
//! links never own anything; a [`Tree`] owns its root and every node owns its
//! children.
//!
//! ```
//! use linked_bst::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [10, 5, 15, 3, 7, 12, 18] {
//!     tree.insert(key);
//! }
//!
//! // 7 has no right child so its successor is found by climbing to 10.
//! assert_eq!(tree.successor_of(&7), Some(&10));
//! assert_eq!(tree.find_min().map(|n| *n.key()), Some(3));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod node;
pub mod tree;

#[cfg(test)]
mod test;

pub use error::InvariantError;
pub use node::Node;
pub use tree::Tree;
