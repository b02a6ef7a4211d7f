//! A single vertex of a [`Tree`][crate::Tree] along with every algorithm that only needs a subtree
//! to do its job: searching, placing a new leaf, splicing a node out and walking to in-order
//! neighbours.
//!
//! Children are owned through `Link`s. The parent is a plain back pointer and never owns
//! anything. It addresses the parent's `Links` header rather than the whole node so that the tree
//! can temporarily hang its root under a stack-local sentinel slot, which has no key, when the root
//! itself is deleted.
//!
//! # Handles and key swaps
//!
//! Deleting a node with two children doesn't unlink that node. Its key is swapped with its in-order
//! successor and the successor is unlinked instead. A node that stays in the tree may therefore
//! carry a different key after a deletion. Handles are plain borrows of the tree so none of them can
//! be held across a mutation.

use std::cmp::Ordering;
use std::fmt;
use std::ptr::{self, NonNull};

use tracing::trace;

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// An owning pointer to a child (or the root). Empty when there is no node.
pub(crate) struct Link<K>(pub(crate) Option<NonNull<Node<K>>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<K> Copy for Link<K> {}

impl<K> Link<K> {
    pub(crate) fn node(&self) -> Option<&Node<K>> {
        // SAFETY: A non-empty link always points at a live node owned by the tree. The returned
        // borrow is tied to `self` and every mutation of the tree goes through `&mut Tree`, so the
        // node can't be changed or freed while the borrow lives.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    pub(crate) fn is(&self, node: NonNull<Node<K>>) -> bool {
        self.0 == Some(node)
    }
}

/// The structural half of a node. A sentinel parent slot is a bare `Links` with no node around it.
pub(crate) struct Links<K> {
    pub(crate) parent: Option<NonNull<Links<K>>>,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
}

impl<K> Links<K> {
    pub(crate) fn detached() -> Self {
        Self {
            parent: None,
            left: Link(None),
            right: Link(None),
        }
    }

    pub(crate) fn slot(&self, side: Side) -> &Link<K> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Link<K> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The slot holding `node`. Anything that isn't the left child is taken to be the right one.
    pub(crate) fn side_of(&self, node: NonNull<Node<K>>) -> Side {
        if self.left.is(node) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// One vertex of a [`Tree`][crate::Tree].
///
/// Nodes handed out by the tree are read-only views: they expose the key and the neighbouring
/// nodes but the structure can only be changed through the tree. A node returned by
/// [`Tree::delete`][crate::Tree::delete] is detached and owned by the caller.
#[repr(C)]
pub struct Node<K> {
    // Must stay the first field. Parent pointers address this header and are cast back to the
    // enclosing `Node`.
    pub(crate) links: Links<K>,
    pub(crate) key: K,
    /// Reserved for balancing. Always 0.
    pub(crate) height: usize,
}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("height", &self.height)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<K> Node<K> {
    pub(crate) fn new_boxed(key: K) -> Box<Self> {
        Box::new(Node {
            height: 0,
            key,
            links: Links::detached(),
        })
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The left child, whose subtree holds keys strictly smaller than this node's.
    pub fn left(&self) -> Option<&Self> {
        self.links.left.node()
    }

    /// The right child, whose subtree holds keys greater than or equal to this node's.
    pub fn right(&self) -> Option<&Self> {
        self.links.right.node()
    }

    /// The parent of this node, or `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<&Self> {
        // SAFETY: Outside of `Tree::delete` every parent pointer addresses the `links` header of a
        // live `Node`. `links` is the first field of this `repr(C)` struct so the cast recovers the
        // parent itself. The sentinel slot used by `Tree::delete` only exists while the tree is
        // mutably borrowed, so no `&Node` can reach it.
        self.links
            .parent
            .map(|parent| unsafe { parent.cast::<Self>().as_ref() })
    }

    /// Height reserved for a balancing extension. It is never maintained and is always 0.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Consumes a detached node and returns its key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Finds the node with the given key in the subtree rooted at this node. Equal keys live to the
    /// right, so with duplicates this is the one closest to this node.
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
    /// let five = tree.find(&5).unwrap();
    /// assert_eq!(five.find(&7).map(|n| *n.key()), Some(7));
    ///
    /// // 15 exists, but not below 5.
    /// assert!(five.find(&15).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Self>
    where
        K: Ord,
    {
        // SAFETY: `find_raw` only reads through the pointer, which comes from `&self`, and any node
        // it returns belongs to this subtree so it lives as long as the borrow of `self`.
        unsafe { Self::find_raw(NonNull::from(self), key).map(|node| node.as_ref()) }
    }

    /// The node with the smallest key in the subtree rooted at this node.
    pub fn find_min(&self) -> &Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }

        current
    }

    /// The node with the largest key in the subtree rooted at this node.
    pub fn find_max(&self) -> &Self {
        let mut current = self;
        while let Some(right) = current.right() {
            current = right;
        }

        current
    }

    /// The in-order predecessor of this node in the whole tree, if there is one.
    ///
    /// With a left subtree, that's its largest node. Without one, we climb while we're the left
    /// child of our parent. The first parent we reach from its right side is the predecessor.
    pub fn next_smaller(&self) -> Option<&Self> {
        if let Some(left) = self.left() {
            return Some(left.find_max());
        }

        let mut current = self;
        while let Some(parent) = current.parent() {
            if !parent.links.left.is(NonNull::from(current)) {
                return Some(parent);
            }
            current = parent;
        }

        None
    }

    /// The in-order successor of this node in the whole tree, if there is one. Mirror image of
    /// [`next_smaller`](Self::next_smaller).
    pub fn next_larger(&self) -> Option<&Self> {
        if let Some(right) = self.right() {
            return Some(right.find_min());
        }

        let mut current = self;
        while let Some(parent) = current.parent() {
            if !parent.links.right.is(NonNull::from(current)) {
                return Some(parent);
            }
            current = parent;
        }

        None
    }

    /// # Safety
    ///
    /// `root` must point at a live node and its subtree must not be mutated while this runs.
    pub(crate) unsafe fn find_raw(root: NonNull<Self>, key: &K) -> Option<NonNull<Self>>
    where
        K: Ord,
    {
        let mut current = root;
        loop {
            let node = current.as_ptr();
            let next = match key.cmp(&(*node).key) {
                Ordering::Equal => return Some(current),
                Ordering::Less => (*node).links.left.0,
                Ordering::Greater => (*node).links.right.0,
            };
            current = next?;
        }
    }

    /// # Safety
    ///
    /// `root` must point at a live node.
    unsafe fn min_of(root: NonNull<Self>) -> NonNull<Self> {
        let mut current = root;
        while let Some(left) = (*current.as_ptr()).links.left.0 {
            current = left;
        }

        current
    }

    /// Places the detached `node` as a new leaf below `root`. Smaller keys go left and everything
    /// else goes right, so equal keys are always found by descending right.
    ///
    /// # Safety
    ///
    /// `root` must be a live node of a tree the caller has exclusive access to. `node` must be a
    /// detached node leaked from a `Box` that nothing else references.
    pub(crate) unsafe fn insert(root: NonNull<Self>, node: NonNull<Self>)
    where
        K: Ord,
    {
        let mut parent = root;
        let side = loop {
            let side = if (*node.as_ptr()).key < (*parent.as_ptr()).key {
                Side::Left
            } else {
                Side::Right
            };
            let slot = (*parent.as_ptr()).links.slot_mut(side);
            match slot.0 {
                Some(child) => parent = child,
                None => {
                    *slot = Link(Some(node));
                    (*node.as_ptr()).links.parent = Some(parent.cast());
                    break side;
                }
            }
        };
        trace!(?side, "placed new leaf");

        if cfg!(debug_assertions) {
            let (parent, node) = (parent.as_ref(), node.as_ref());
            match side {
                Side::Left => assert!(node.key < parent.key),
                Side::Right => assert!(node.key >= parent.key),
            }
            assert!(ptr::eq(node.parent().expect("just linked"), parent));
        }
    }

    /// Removes `node` from its tree and returns the node that was actually unlinked. That node
    /// always carries `node`'s original key and its links are cleared.
    ///
    /// A node with at most one child is spliced out: the child, or nothing, takes its place in the
    /// parent's slot. A node with two children swaps keys with its in-order successor, the leftmost
    /// node of its right subtree, and deletes that one instead. The successor has no left child so
    /// the second round is always a splice.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of a tree the caller has exclusive access to. The returned node is
    /// no longer referenced by the tree and the caller becomes responsible for freeing it.
    ///
    /// # Panics
    ///
    /// When a splice is needed and `node` has no parent slot. The tree hangs its root under a
    /// sentinel slot before deleting it so this can't happen through [`Tree`][crate::Tree].
    pub(crate) unsafe fn delete(node: NonNull<Self>) -> NonNull<Self> {
        let this = node.as_ptr();
        match ((*this).links.left.0, (*this).links.right.0) {
            (Some(_), Some(right)) => {
                let successor = Self::min_of(right);
                trace!("node has two children, swapping key with its successor");
                ptr::swap(
                    ptr::addr_of_mut!((*this).key),
                    ptr::addr_of_mut!((*successor.as_ptr()).key),
                );
                Self::delete(successor)
            }
            (child, None) | (None, child) => {
                let parent = (*this)
                    .links
                    .parent
                    .expect("splicing a node out requires a parent slot");
                let side = (*parent.as_ptr()).side_of(node);
                *(*parent.as_ptr()).slot_mut(side) = Link(child);
                if let Some(child) = child {
                    (*child.as_ptr()).links.parent = Some(parent);
                }
                (*this).links = Links::detached();
                trace!(?side, has_child = child.is_some(), "spliced node out");

                node
            }
        }
    }
}
