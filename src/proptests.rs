use super::*;
use crate::config::DEFAULT_MAX_LOAD_FACTOR;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::HashMap;

fn validate_table<V, H: KeyHasher>(t: &ProbeTable<V, H>) {
    let capacity = t.capacity();
    let mut live = 0usize;
    let mut dead = 0usize;

    for (index, slot) in t.slots.iter().enumerate() {
        match slot {
            Slot::Empty => {}
            Slot::Tombstone => dead += 1,
            Slot::Occupied(entry) => {
                live += 1;
                assert!(!entry.key.is_empty(), "empty key stored at {index}");

                // No empty slot may sit between an entry and its home slot,
                // otherwise lookups would stop short of it.
                let home = home_slot(t.hasher.hash_key(&entry.key), capacity);
                let mut i = home;
                while i != index {
                    assert!(
                        !matches!(t.slots[i], Slot::Empty),
                        "gap at {i} between home {home} and slot {index}"
                    );
                    i = (i + 1) % capacity;
                }
            }
        }
    }

    assert_eq!(live, t.len(), "occupied slots must match len");
    assert_eq!(dead, t.tombstones(), "tombstone count must match");

    let mut keys: Vec<&str> = t.keys().collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), t.len(), "duplicate active keys");
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // A tiny alphabet keeps anagrams (and so additive-hash collisions) common.
    "[a-e]{1,4}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "key_strategy()")] String, u64),
    #[proptest(weight = 25)]
    Delete(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 24)]
    Lookup(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 1)]
    Clear,
}

fn run_against_model<H: KeyHasher>(t: &mut ProbeTable<u64, H>, ops: Vec<Op>) -> std::result::Result<(), TestCaseError> {
    let mut m: HashMap<String, u64> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let full = t.len() == t.capacity() && !m.contains_key(&key);
                let got = t.insert(&key, value);
                if full && t.growth() == Growth::Fixed {
                    prop_assert_eq!(got, Err(TableError::TableFull { capacity: t.capacity() }));
                } else {
                    prop_assert_eq!(got, Ok(m.insert(key, value)));
                }
            }
            Op::Delete(key) => {
                let got = t.delete(&key).ok();
                prop_assert_eq!(got, m.remove(&key));
            }
            Op::Lookup(key) => {
                let got = t.lookup(&key).ok().copied();
                prop_assert_eq!(got, m.get(&key).copied());
            }
            Op::Clear => {
                t.clear();
                m.clear();
            }
        }

        prop_assert_eq!(t.len(), m.len());
    }

    validate_table(t);
    let mut got: Vec<(String, u64)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    let mut expected: Vec<(String, u64)> = m.into_iter().collect();
    got.sort();
    expected.sort();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_growable(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        let mut t: ProbeTable<u64> = ProbeTable::with_config(
            Config::default().with_initial_capacity(4),
        ).unwrap();
        run_against_model(&mut t, ops)?;
        prop_assert!(t.load_factor() <= DEFAULT_MAX_LOAD_FACTOR);
    }

    #[test]
    fn prop_equivalence_fixed(
        capacity in 1usize..=12,
        ops in prop::collection::vec(any::<Op>(), 0..=500),
    ) {
        let mut t: ProbeTable<u64> = ProbeTable::with_capacity(capacity).unwrap();
        run_against_model(&mut t, ops)?;
        prop_assert_eq!(t.capacity(), capacity);
    }

    #[test]
    fn prop_equivalence_fnv(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t: ProbeTable<u64, Fnv1aHasher> =
            ProbeTable::with_hasher(Config::default().with_initial_capacity(2), Fnv1aHasher).unwrap();
        run_against_model(&mut t, ops)?;
    }

    #[test]
    fn prop_distinct_keys_fill_fixed_table(capacity in 1usize..=32) {
        let mut t: ProbeTable<usize> = ProbeTable::with_capacity(capacity).unwrap();
        for i in 0..capacity {
            prop_assert_eq!(t.insert(&format!("k{i}"), i), Ok(None));
        }
        prop_assert_eq!(
            t.insert("overflow", capacity),
            Err(TableError::TableFull { capacity })
        );
        for i in 0..capacity {
            prop_assert_eq!(t.lookup(&format!("k{i}")), Ok(&i));
        }
    }

    #[test]
    fn prop_delete_keeps_later_chain_reachable(
        keys in prop::collection::hash_set(key_strategy(), 2..=8),
        victim in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut t: ProbeTable<usize> = ProbeTable::with_capacity(keys.len()).unwrap();
        for (i, key) in keys.iter().enumerate() {
            t.insert(key, i).unwrap();
        }

        let victim = victim.index(keys.len());
        prop_assert_eq!(t.delete(&keys[victim]), Ok(victim));
        prop_assert!(t.lookup(&keys[victim]).is_err());
        for (i, key) in keys.iter().enumerate() {
            if i != victim {
                prop_assert_eq!(t.lookup(key), Ok(&i));
            }
        }
        validate_table(&t);
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
fn exhaustive_insert_order_colliding_keys() {
    // All six share one home slot under the additive hash.
    let keys = ["abc", "acb", "bac", "bca", "cab", "cba"];

    for_each_permutation(&keys, |perm| {
        let mut t: ProbeTable<usize> = ProbeTable::with_capacity(7).unwrap();
        for key in &perm {
            t.insert(key, key.len()).unwrap();
        }
        validate_table(&t);
        for key in keys {
            assert_eq!(t.lookup(key), Ok(&3), "lost {key} after {perm:?}");
        }
    });
}

#[test]
fn exhaustive_delete_order_colliding_keys() {
    let keys = ["abc", "acb", "bac", "bca", "cab", "cba"];

    let mut base: ProbeTable<usize> = ProbeTable::with_capacity(6).unwrap();
    for (i, key) in keys.iter().enumerate() {
        base.insert(key, i).unwrap();
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut remaining: HashMap<&str, usize> =
            keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        for key in perm {
            let expected = remaining.remove(key);
            assert_eq!(t.remove(key), expected);
            for (k, v) in &remaining {
                assert_eq!(t.get(k), Some(v), "lost {k} after deleting {key}");
            }
            validate_table(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.tombstones(), 6);
    });
}
