//! Errors reported by [`Tree::validate`][crate::Tree::validate].

use thiserror::Error;

/// A structural invariant of a [`Tree`][crate::Tree] that doesn't hold.
///
/// Depths count edges from the root, which sits at depth 0.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// The root node has a parent link.
    #[error("the root node has a parent")]
    RootHasParent,

    /// A child's parent link doesn't point back at the node holding it.
    #[error("node at depth {depth} does not point back at its parent")]
    BrokenParentLink {
        /// Depth of the child with the bad link.
        depth: usize,
    },

    /// A key is outside the range its ancestors allow: smaller keys must be to the left and greater
    /// or equal keys to the right.
    #[error("node at depth {depth} is out of order with its ancestors")]
    OrderViolation {
        /// Depth of the misplaced node.
        depth: usize,
    },

    /// The tree's recorded length doesn't match the number of reachable nodes.
    #[error("tree records {expected} nodes but {found} were reached")]
    LengthMismatch {
        /// The length recorded by the tree.
        expected: usize,
        /// How many nodes the walk reached before it finished or gave up.
        found: usize,
    },
}
