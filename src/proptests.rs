use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // A narrow key space makes duplicates and misses common
    let key = 0u16..512;
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        35 => key.clone().prop_map(Op::Remove),
        15 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: BalancedTree<u16, u32> = BalancedTree::new();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let got_t = t.insert(key, value);
                    if m.contains_key(&key) {
                        prop_assert_eq!(got_t, Err(TreeError::DuplicateKey));
                    } else {
                        m.insert(key, value);
                        prop_assert_eq!(got_t, Ok(()));
                    }
                }
                Op::Remove(key) => {
                    let got_t = t.remove(&key);
                    let got_m = m.remove(&key).ok_or(TreeError::KeyNotFound);
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            prop_assert!(t.is_balanced());
        }

        t.check_consistency();
        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insert_then_remove_all(keys in prop::collection::hash_set(any::<i32>(), 0..500)) {
        let keys: Vec<i32> = keys.into_iter().collect();
        let mut t = BalancedTree::new();
        for key in &keys {
            prop_assert_eq!(t.insert(*key, ()), Ok(()));
            prop_assert!(t.lowest_unbalanced_key().is_none());
        }
        t.check_consistency();

        let mut in_order = Vec::new();
        t.traverse_in_order(|key, _| in_order.push(*key));
        prop_assert!(in_order.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(in_order.len(), keys.len());

        for key in &keys {
            prop_assert_eq!(t.remove(key), Ok(()));
            prop_assert!(!t.contains_key(key));
            prop_assert!(t.is_balanced());
        }
        prop_assert!(t.is_empty());
        prop_assert_eq!(t.len(), 0);
        prop_assert!(t.root().is_none());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_then_remove_orders() {
    let keys = [1, 2, 3, 4, 5, 6];

    for_each_permutation(&keys, |insert_order| {
        let mut t = BalancedTree::new();
        for key in &insert_order {
            t.insert(*key, *key * 10).unwrap();
            t.check_consistency();
        }

        for_each_permutation(&insert_order[..4], |remove_order| {
            let mut t = t.clone();
            for key in &remove_order {
                assert_eq!(t.remove(key), Ok(*key * 10));
                t.check_consistency();
            }
            assert_eq!(t.len(), keys.len() - remove_order.len());
        });
    });
}
