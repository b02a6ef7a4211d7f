//! Property tests that drive the tree through its public API only.

mod tree;

use linked_bst::Tree;

/// Builds a tree by inserting `xs` in order.
pub(crate) fn build<K: Ord + Clone>(xs: &[K]) -> Tree<K> {
    let mut tree = Tree::new();
    for x in xs {
        tree.insert(x.clone());
    }

    tree
}

/// Collects the keys of `tree` in order by walking the node handles.
pub(crate) fn in_order<K: Clone>(tree: &Tree<K>) -> Vec<K> {
    let mut keys = Vec::new();
    let mut stack = Vec::new();
    let mut current = tree.root();
    loop {
        while let Some(node) = current {
            stack.push(node);
            current = node.left();
        }
        let Some(node) = stack.pop() else {
            break;
        };
        keys.push(node.key().clone());
        current = node.right();
    }

    keys
}
