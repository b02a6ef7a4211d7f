//! The owning side of the BST. A [`Tree`] holds the root [`Node`] and hands every operation down to
//! it, except deleting the root itself which needs a parent slot the root doesn't have.
//!
//! # Examples
//!
//! ```
//! use linked_bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.find(&1).is_none());
//!
//! tree.insert(1);
//! assert_eq!(tree.find(&1).map(|n| *n.key()), Some(1));
//!
//! // Equal keys don't merge. Both are stored.
//! tree.insert(1);
//! assert_eq!(tree.len(), 2);
//!
//! // Deleting hands back a detached node holding the key.
//! let deleted = tree.delete(&1).unwrap();
//! assert_eq!(deleted.into_key(), 1);
//! assert_eq!(tree.len(), 1);
//! ```

use std::fmt;
use std::ptr::NonNull;

use tracing::trace;

use crate::error::InvariantError;
use crate::node::{Link, Links, Node, Side};

/// An unbalanced Binary Search Tree over keys of type `K`. Nodes keep a pointer to their parent so
/// in-order neighbours can be found by climbing.
pub struct Tree<K> {
    // A raw `Link` rather than an `Option<Box<Node>>` so that moving the `Tree` around doesn't
    // invalidate the root's children's parent pointers.
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        let mut pending: Vec<NonNull<Node<K>>> = self.root.take().0.into_iter().collect();
        while let Some(node) = pending.pop() {
            // SAFETY: Every node is owned by exactly one link so it's pushed exactly once. Nodes are
            // allocated with `Box::new` in `Node::new_boxed`.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            pending.extend(node.links.left.0);
            pending.extend(node.links.right.0);
        }
    }
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    /// Copies the tree node by node, so the clone has exactly the same shape.
    fn clone(&self) -> Self {
        let mut cloned = Self::new();
        let Some(root) = self.root.0 else {
            return cloned;
        };

        // SAFETY: `root` is live for as long as `self` is borrowed.
        let root_copy = Node::new_boxed(unsafe { root.as_ref() }.key().clone());
        let root_copy = NonNull::from(Box::leak(root_copy));
        cloned.root = Link(Some(root_copy));

        let mut pending = vec![(root, root_copy)];
        while let Some((source, copy)) = pending.pop() {
            for side in [Side::Left, Side::Right] {
                // SAFETY: `source` belongs to `self` which is borrowed for the whole clone. `copy`
                // belongs to `cloned` which nothing else can see yet. Each child copy is linked
                // before the next `K::clone`, so if that panics dropping `cloned` frees it.
                unsafe {
                    let Some(child) = source.as_ref().links.slot(side).0 else {
                        continue;
                    };
                    let child_copy = Node::new_boxed(child.as_ref().key().clone());
                    let child_copy = NonNull::from(Box::leak(child_copy));
                    (*child_copy.as_ptr()).links.parent = Some(copy.cast());
                    *(*copy.as_ptr()).links.slot_mut(side) = Link(Some(child_copy));
                    pending.push((child, child_copy));
                }
            }
        }
        cloned.len = self.len;

        cloned
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
        }
    }

    /// The number of keys in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.node()
    }

    /// Finds a node with the given key. With duplicate keys this is the one closest to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.find(&1).map(|n| *n.key()), Some(1));
    /// assert!(tree.find(&42).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.root().and_then(|root| root.find(key))
    }

    /// The node with the smallest key.
    pub fn find_min(&self) -> Option<&Node<K>> {
        self.root().map(Node::find_min)
    }

    /// The node with the largest key.
    pub fn find_max(&self) -> Option<&Node<K>> {
        self.root().map(Node::find_max)
    }

    /// The in-order predecessor of the node holding `key`. This is not a nearest-key search: if
    /// `key` isn't in the tree the result is `None`.
    pub fn next_smaller(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.find(key).and_then(Node::next_smaller)
    }

    /// The in-order successor of the node holding `key`, or `None` if `key` isn't in the tree or
    /// nothing follows it.
    pub fn next_larger(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.find(key).and_then(Node::next_larger)
    }

    /// The key right before `key` in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [10, 5, 15, 3, 7, 12, 18] {
    ///     tree.insert(key);
    /// }
    ///
    /// assert_eq!(tree.predecessor_of(&10), Some(&7));
    /// assert_eq!(tree.predecessor_of(&3), None);
    ///
    /// // Only keys in the tree have predecessors.
    /// assert_eq!(tree.predecessor_of(&11), None);
    /// ```
    pub fn predecessor_of(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        self.next_smaller(key).map(Node::key)
    }

    /// The key right after `key` in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [10, 5, 15, 3, 7, 12, 18] {
    ///     tree.insert(key);
    /// }
    ///
    /// assert_eq!(tree.successor_of(&10), Some(&12));
    /// assert_eq!(tree.successor_of(&18), None);
    /// ```
    pub fn successor_of(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        self.next_larger(key).map(Node::key)
    }

    /// Inserts `key` as a new leaf and returns it. An equal key already in the tree is kept: the
    /// new one goes to its right.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// let root = tree.insert(2);
    /// assert!(root.parent().is_none());
    ///
    /// let leaf = tree.insert(1);
    /// assert_eq!(leaf.parent().map(|n| *n.key()), Some(2));
    /// ```
    pub fn insert(&mut self, key: K) -> &Node<K>
    where
        K: Ord,
    {
        let node = NonNull::from(Box::leak(Node::new_boxed(key)));
        match self.root.0 {
            // SAFETY: The root is live and `&mut self` means nothing else is looking at the tree.
            // `node` was just leaked so nothing references it.
            Some(root) => unsafe { Node::insert(root, node) },
            None => {
                self.root = Link(Some(node));
                trace!("new node became the root");
            }
        }
        self.len += 1;
        trace!(len = self.len, "inserted key");

        // SAFETY: The tree owns `node` now. The returned borrow keeps `self` borrowed so the node
        // can't be deleted while it's in use.
        unsafe { node.as_ref() }
    }

    /// Deletes one node holding `key` and returns it detached from the tree. Returns `None` if the
    /// key isn't in the tree.
    ///
    /// When the node holding `key` has two children, its key is swapped with its successor and the
    /// successor's node is the one unlinked. Either way the returned node holds `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [10, 5, 15, 3, 7] {
    ///     tree.insert(key);
    /// }
    ///
    /// let deleted = tree.delete(&5).unwrap();
    /// assert_eq!(*deleted.key(), 5);
    /// assert!(tree.find(&5).is_none());
    ///
    /// assert!(tree.delete(&42).is_none());
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<Node<K>>
    where
        K: Ord,
    {
        let target = self.find_ptr(key)?;
        let removed = if self.root.is(target) {
            // SAFETY: `&mut self` gives exclusive access and the root exists.
            unsafe { self.delete_root() }
        } else {
            // SAFETY: `&mut self` gives exclusive access and `target` isn't the root so it has a
            // real parent to be spliced out of.
            unsafe { Node::delete(target) }
        };
        self.len -= 1;
        trace!(len = self.len, "deleted key");

        // SAFETY: `Node::delete` unlinked `removed` and cleared its links so nothing references it
        // any more. It was allocated with `Box::new` in `Node::new_boxed`.
        Some(*unsafe { Box::from_raw(removed.as_ptr()) })
    }

    /// Deletes the root by hanging it under a stack-local sentinel slot so that `Node::delete` has
    /// a parent to splice into, then adopts whatever the sentinel ends up holding as the new root.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to the tree.
    ///
    /// # Panics
    ///
    /// When the tree is empty.
    unsafe fn delete_root(&mut self) -> NonNull<Node<K>> {
        let root = self
            .root
            .take()
            .0
            .expect("deleting the root requires a root");
        trace!("deleting the root through a sentinel slot");

        let mut sentinel = Links::detached();
        sentinel.left = Link(Some(root));
        // Everything after this goes through the pointer, since the root's parent link aliases it.
        let sentinel = NonNull::from(&mut sentinel);
        (*root.as_ptr()).links.parent = Some(sentinel);

        let removed = Node::delete(root);

        self.root = (*sentinel.as_ptr()).left.take();
        if let Some(new_root) = self.root.0 {
            (*new_root.as_ptr()).links.parent = None;
        }

        removed
    }

    /// Finds a node holding `key` as a pointer that may be used to mutate the tree.
    pub(crate) fn find_ptr(&mut self, key: &K) -> Option<NonNull<Node<K>>>
    where
        K: Ord,
    {
        // SAFETY: The root is live and `&mut self` means nothing else is looking at the tree.
        self.root
            .0
            .and_then(|root| unsafe { Node::find_raw(root, key) })
    }

    /// Walks the whole tree and checks its structural invariants: keys are ordered with equal keys
    /// to the right, every child points back at its parent, the root has no parent and `len`
    /// matches the number of nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [3, 1, 4, 1, 5, 9, 2, 6] {
    ///     tree.insert(key);
    /// }
    /// tree.delete(&3);
    ///
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        let mut reached = 0;
        if let Some(root) = self.root() {
            if root.links.parent.is_some() {
                return Err(InvariantError::RootHasParent);
            }

            // Each entry carries the bounds set by its ancestors: at least `lower` and strictly
            // below `upper`.
            let mut pending = vec![(root, 0, None, None)];
            while let Some((node, depth, lower, upper)) = pending.pop() {
                reached += 1;
                // Also stops the walk if the links were ever to form a cycle.
                if reached > self.len {
                    return Err(InvariantError::LengthMismatch {
                        expected: self.len,
                        found: reached,
                    });
                }

                let key = node.key();
                let below_lower = lower.map_or(false, |lower: &K| key < lower);
                let above_upper = upper.map_or(false, |upper: &K| key >= upper);
                if below_lower || above_upper {
                    return Err(InvariantError::OrderViolation { depth });
                }

                let this = NonNull::from(node).cast::<Links<K>>();
                let children = [
                    (node.left(), lower, Some(key)),
                    (node.right(), Some(key), upper),
                ];
                for (child, lower, upper) in children {
                    let Some(child) = child else {
                        continue;
                    };
                    if child.links.parent != Some(this) {
                        return Err(InvariantError::BrokenParentLink { depth: depth + 1 });
                    }
                    pending.push((child, depth + 1, lower, upper));
                }
            }
        }

        if reached == self.len {
            Ok(())
        } else {
            Err(InvariantError::LengthMismatch {
                expected: self.len,
                found: reached,
            })
        }
    }
}
