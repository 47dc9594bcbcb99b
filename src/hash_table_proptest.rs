#![cfg(all(test, feature = "std"))]

// State-machine tests for HashTable against std's HashMap. Kept inside the
// crate so every step can check the table's structural invariants.

use std::collections::HashMap;
use std::vec::Vec;

use proptest::prelude::*;

use crate::growth::GrowthPolicy;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, u32),
    Upsert(u8, u32),
    Remove(u8),
    Find(u8),
    CursorRemove(u8),
    Retain(u8),
    Reserve(u8),
    Rehash(u16),
    Shrink,
    Clear,
    LoadFactor(f32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Upsert(k, v)),
        3 => any::<u8>().prop_map(Op::Remove),
        2 => any::<u8>().prop_map(Op::Find),
        1 => any::<u8>().prop_map(Op::CursorRemove),
        1 => (2u8..8).prop_map(Op::Retain),
        1 => (0u8..64).prop_map(Op::Reserve),
        1 => (0u16..512).prop_map(Op::Rehash),
        1 => Just(Op::Shrink),
        1 => Just(Op::Clear),
        1 => proptest::sample::select(vec![0.25f32, 0.5, 0.75, 0.9, 1.0]).prop_map(Op::LoadFactor),
    ]
}

fn arb_policy() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![Just(GrowthPolicy::PowerOfTwo), Just(GrowthPolicy::Prime)]
}

// A small `spread` folds many keys onto the same hash so chains, wrap-around
// and backward shifts are exercised constantly.
fn hash_of(key: u8, spread: u8) -> u64 {
    u64::from(key % spread).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn check(
    table: &HashTable<(u8, u32)>,
    model: &HashMap<u8, u32>,
    spread: u8,
) -> Result<(), TestCaseError> {
    table.assert_invariants();
    prop_assert_eq!(table.len(), model.len());
    prop_assert!(table.load_factor() <= 1.0);
    for (&k, &v) in model {
        let found = table.find(hash_of(k, spread), |&(key, _)| key == k);
        prop_assert_eq!(found, Some(&(k, v)));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_model(
        policy in arb_policy(),
        spread in 1u8..=255,
        ops in proptest::collection::vec(arb_op(), 1..200),
    ) {
        let mut table: HashTable<(u8, u32)> = HashTable::with_policy(policy);
        let mut model: HashMap<u8, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let old = table.insert(hash_of(k, spread), (k, v), |&(key, _)| key == k);
                    prop_assert_eq!(old.map(|(_, v)| v), model.insert(k, v));
                }
                Op::Upsert(k, v) => {
                    match table.entry(hash_of(k, spread), |&(key, _)| key == k) {
                        Entry::Occupied(mut entry) => {
                            prop_assert!(model.contains_key(&k));
                            entry.get_mut().1 = v;
                        }
                        Entry::Vacant(entry) => {
                            prop_assert!(!model.contains_key(&k));
                            entry.insert((k, v));
                        }
                    }
                    model.insert(k, v);
                }
                Op::Remove(k) => {
                    let removed = table.remove(hash_of(k, spread), |&(key, _)| key == k);
                    prop_assert_eq!(removed.map(|(_, v)| v), model.remove(&k));
                }
                Op::Find(k) => {
                    let hash = hash_of(k, spread);
                    prop_assert_eq!(
                        table.contains(hash, |&(key, _)| key == k),
                        model.contains_key(&k)
                    );
                    prop_assert_eq!(
                        table.count(hash, |&(key, _)| key == k),
                        usize::from(model.contains_key(&k))
                    );
                }
                Op::CursorRemove(k) => {
                    let mut cursor = table.find_cursor_mut(hash_of(k, spread), |&(key, _)| key == k);
                    let removed = cursor.remove_current();
                    prop_assert_eq!(removed.map(|(_, v)| v), model.remove(&k));
                }
                Op::Retain(m) => {
                    table.retain(|&mut (k, _)| k % m != 0);
                    model.retain(|&k, _| k % m != 0);
                }
                Op::Reserve(n) => {
                    let additional = usize::from(n);
                    table.reserve(additional);
                    let needed = (table.len() + additional) as f64;
                    prop_assert!(
                        needed <= f64::from(table.max_load_factor()) * table.capacity() as f64
                    );
                }
                Op::Rehash(n) => {
                    let before = table.capacity();
                    table.rehash(usize::from(n));
                    prop_assert!(table.capacity() > usize::from(n) || table.capacity() == before);
                    prop_assert!(table.capacity() >= before);
                }
                Op::Shrink => {
                    let before = table.capacity();
                    table.shrink_to_fit();
                    prop_assert!(table.capacity() <= before);
                }
                Op::Clear => {
                    let before = table.capacity();
                    table.clear();
                    model.clear();
                    prop_assert_eq!(table.capacity(), before);
                }
                Op::LoadFactor(lf) => {
                    table.set_max_load_factor(lf);
                    prop_assert_eq!(table.max_load_factor(), lf);
                }
            }
            check(&table, &model, spread)?;
        }

        let mut seen: Vec<(u8, u32)> = table.iter().copied().collect();
        seen.sort_unstable();
        let mut expected: Vec<(u8, u32)> = model.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_drain_yields_everything_once(
        keys in proptest::collection::hash_set(any::<u16>(), 0..300),
    ) {
        let mut table = HashTable::new();
        for &k in &keys {
            table.insert(u64::from(k) * 31, k, |&v| v == k);
        }
        let mut drained: Vec<u16> = table.drain().collect();
        drained.sort_unstable();
        let mut expected: Vec<u16> = keys.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
        prop_assert!(table.is_empty());
        table.assert_invariants();
    }
}
