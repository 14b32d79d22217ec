#![cfg(test)]

// Property tests kept inside the crate so the invariant checker can reach
// the tree internals.

use proptest::prelude::*;

use super::tests::{ascending, assert_valid};
use super::{RbTree, Unique};

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    InsertUnique(i32),
    Remove(i32),
    Find(i32),
}

// Small key range to force duplicates and repeated remove/insert of the
// same key.
fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0..32i32).prop_map(Op::Insert),
        (0..32i32).prop_map(Op::InsertUnique),
        (0..32i32).prop_map(Op::Remove),
        (0..32i32).prop_map(Op::Find),
    ];
    proptest::collection::vec(op, 1..120)
}

fn model_sorted(model: &[i32]) -> Vec<i32> {
    let mut sorted = model.to_vec();
    // The descent rule inverts the comparator: traversal runs descending.
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

// Property: state-machine equivalence against a plain multiset model.
// After every operation the red-black invariants hold (root black, no
// red-red edge, uniform black-height, counter accuracy, height bound,
// descent-rule order) and traversal matches the model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_operation_sequences(ops in arb_ops()) {
        let mut tree = RbTree::new(ascending);
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    tree.insert(v).unwrap();
                    model.push(v);
                }
                Op::InsertUnique(v) => {
                    let already = model.contains(&v);
                    match tree.insert_unique(v).unwrap() {
                        Unique::New(_) => {
                            prop_assert!(!already, "inserted {} despite duplicate", v);
                            model.push(v);
                        }
                        Unique::Existing { candidate, .. } => {
                            prop_assert!(already, "spurious duplicate for {}", v);
                            prop_assert_eq!(candidate, v);
                        }
                    }
                }
                Op::Remove(v) => {
                    let removed = tree.remove(&v);
                    if let Some(pos) = model.iter().position(|m| *m == v) {
                        prop_assert_eq!(removed, Some(v));
                        model.swap_remove(pos);
                    } else {
                        prop_assert_eq!(removed, None);
                    }
                }
                Op::Find(v) => {
                    prop_assert_eq!(tree.contains(&v), model.contains(&v));
                }
            }

            assert_valid(&tree);
            prop_assert_eq!(tree.len(), model.len());

            let mut traversed = Vec::with_capacity(tree.len());
            tree.traverse(|v| traversed.push(*v));
            prop_assert_eq!(traversed, model_sorted(&model));
        }
    }
}

proptest! {
    #[test]
    fn prop_drain_in_random_order(values in proptest::collection::vec(-100..100i32, 1..64)) {
        let order = {
            let mut order: Vec<usize> = (0..values.len()).collect();
            // Deterministic scramble keyed off the values themselves.
            let seed = values.iter().fold(7usize, |acc, v| acc.wrapping_mul(31).wrapping_add(*v as usize));
            for i in (1..order.len()).rev() {
                order.swap(i, seed.wrapping_mul(i) % (i + 1));
            }
            order
        };

        let mut tree = RbTree::new(ascending);
        for v in &values {
            tree.insert(*v).unwrap();
        }

        for idx in order {
            let v = values[idx];
            prop_assert_eq!(tree.remove(&v), Some(v));
            assert_valid(&tree);
        }
        prop_assert_eq!(tree.len(), 0);
        prop_assert!(tree.root.is_nil());
    }
}

proptest! {
    #[test]
    fn prop_traversals_agree(values in proptest::collection::vec(any::<i32>(), 0..64)) {
        let mut tree = RbTree::new(ascending);
        for v in &values {
            tree.insert(*v).unwrap();
        }

        let mut forward = Vec::new();
        tree.traverse(|v| forward.push(*v));

        let mut backward = Vec::new();
        tree.traverse_rev(|v| backward.push(*v));
        backward.reverse();

        let iterated: Vec<i32> = tree.iter().copied().collect();

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(&forward, &iterated);
        prop_assert_eq!(forward, model_sorted(&values));
    }
}
