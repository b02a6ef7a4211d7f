use std::collections::BTreeSet;

use linked_bst::Node;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use crate::{build, in_order};

#[quickcheck]
fn in_order_is_sorted(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    let keys = in_order(&tree);
    keys.len() == xs.len() && keys.windows(2).all(|w| w[0] <= w[1])
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    xs.iter()
        .all(|x| tree.find(x).map(|n| n.key()) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = build(&xs);
    let added: BTreeSet<_> = xs.into_iter().collect();

    nots.iter()
        .filter(|x| !added.contains(x))
        .all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn insert_then_find_round_trips(xs: Vec<i8>, x: i8) -> bool {
    let mut tree = build(&xs);

    let inserted = *tree.insert(x).key();
    inserted == x && tree.find(&x).map(|n| *n.key()) == Some(x)
}

#[quickcheck]
fn delete_removes_one_occurrence(xs: Vec<i8>, pick: usize) -> TestResult {
    if xs.is_empty() {
        return TestResult::discard();
    }
    let key = xs[pick % xs.len()];
    let mut tree = build(&xs);

    let deleted = tree.delete(&key).map(Node::into_key);

    let mut expected = xs.clone();
    expected.sort_unstable();
    let at = expected.binary_search(&key).expect("key was inserted");
    expected.remove(at);

    let still_found = tree.find(&key).is_some();
    TestResult::from_bool(
        deleted == Some(key)
            && in_order(&tree) == expected
            && still_found == expected.contains(&key)
            && tree.validate().is_ok(),
    )
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = build(&xs);

    let mut deleted = 0;
    for delete in &deletes {
        if tree.delete(delete).is_some() {
            deleted += 1;
        }
    }

    let mut still_present = xs.clone();
    for delete in &deletes {
        // Deleting removes one occurrence at a time.
        if let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }
    still_present.sort_unstable();

    tree.len() == xs.len() - deleted
        && in_order(&tree) == still_present
        && tree.validate().is_ok()
}

#[quickcheck]
fn neighbours_follow_sorted_order(xs: BTreeSet<i8>) -> bool {
    let tree = build(&xs.iter().copied().collect::<Vec<_>>());
    let sorted: Vec<_> = xs.into_iter().collect();

    let inner = sorted.windows(2).all(|w| {
        tree.successor_of(&w[0]) == Some(&w[1]) && tree.predecessor_of(&w[1]) == Some(&w[0])
    });
    let ends = match (sorted.first(), sorted.last()) {
        (Some(min), Some(max)) => {
            tree.predecessor_of(min).is_none() && tree.successor_of(max).is_none()
        }
        _ => tree.root().is_none(),
    };

    inner && ends
}

#[quickcheck]
fn min_and_max_match_sorted_ends(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    tree.find_min().map(|n| n.key()) == xs.iter().min()
        && tree.find_max().map(|n| n.key()) == xs.iter().max()
}

#[quickcheck]
fn parents_point_back(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    let mut pending: Vec<_> = tree.root().into_iter().collect();
    while let Some(node) = pending.pop() {
        for child in [node.left(), node.right()].into_iter().flatten() {
            if !std::ptr::eq(child.parent().expect("children have parents"), node) {
                return false;
            }
            pending.push(child);
        }
    }

    tree.root().map_or(true, |root| root.parent().is_none())
}
