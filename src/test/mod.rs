pub(crate) mod quick;

use crate::Tree;

/// Collects the keys of `tree` in sorted order using only the read-only node handles.
pub(crate) fn in_order<K: Clone>(tree: &Tree<K>) -> Vec<K> {
    let mut keys = Vec::with_capacity(tree.len());
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
