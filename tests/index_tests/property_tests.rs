//! Property tests for the key indexes and replay
//!
//! - Every index agrees with a BTreeMap model under random set/delete
//! - Ordered indexes walk in strictly ascending key order
//! - Replaying the same log twice yields identical indexes
//! - Encoded values are found again at their replayed ranges

use std::collections::BTreeMap;
use std::io::Cursor;

use proptest::prelude::*;
use triekv::format::BinaryFormat;
use triekv::index::{ByteRange, IndexKind, KeyIndex};

#[derive(Debug, Clone)]
enum Op {
    Set(Vec<u8>, u64, u32),
    Delete(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // Small alphabet so sets and deletes collide often
    prop::collection::vec(prop::sample::select(vec![0u8, 1, b'a', b'b', 0xFF]), 0..6)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (key_strategy(), any::<u64>(), any::<u32>()).prop_map(|(k, o, w)| Op::Set(k, o, w)),
        1 => key_strategy().prop_map(Op::Delete),
    ]
}

fn entries(index: &dyn KeyIndex) -> Vec<(Vec<u8>, ByteRange)> {
    let mut out = Vec::new();
    index.walk(&mut |key, range| {
        out.push((key.to_vec(), range));
        true
    });
    out
}

proptest! {
    #[test]
    fn prop_indexes_match_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        for kind in [IndexKind::Hash, IndexKind::Sorted, IndexKind::Radix] {
            let mut index = kind.build();
            let mut model = BTreeMap::new();

            for op in &ops {
                match op {
                    Op::Set(key, offset, width) => {
                        let range = ByteRange::new(*offset, *width);
                        index.set(key, range).unwrap();
                        model.insert(key.clone(), range);
                    }
                    Op::Delete(key) => {
                        index.delete(key).unwrap();
                        model.remove(key);
                    }
                }
            }

            prop_assert_eq!(index.num_keys(), model.len());
            for (key, range) in &model {
                prop_assert_eq!(index.get(key), Some(*range));
            }

            let mut walked = entries(index.as_ref());
            if index.is_lex_ordered() {
                prop_assert!(walked.windows(2).all(|w| w[0].0 < w[1].0));
            } else {
                walked.sort();
            }
            let expected: Vec<_> = model.into_iter().collect();
            prop_assert_eq!(walked, expected);
        }
    }

    #[test]
    fn prop_replay_is_idempotent_and_locates_values(
        rows in prop::collection::vec(
            (key_strategy(), prop::option::of(prop::collection::vec(any::<u8>(), 0..32))),
            0..50,
        )
    ) {
        let format = BinaryFormat::DEFAULT;
        let mut log = Vec::new();
        let mut latest = BTreeMap::new();
        for (key, value) in &rows {
            match value {
                Some(value) => {
                    log.extend(format.encode_put_row(key, value).unwrap());
                    latest.insert(key.clone(), value.clone());
                }
                None => {
                    log.extend(format.encode_delete_row(key).unwrap());
                    latest.remove(key);
                }
            }
        }

        let mut first = IndexKind::Radix.build();
        let mut second = IndexKind::Radix.build();
        let consumed = format.extract(Cursor::new(&log), first.as_mut()).unwrap();
        format.extract(Cursor::new(&log), second.as_mut()).unwrap();

        prop_assert_eq!(consumed, log.len() as u64);
        prop_assert_eq!(entries(first.as_ref()), entries(second.as_ref()));

        prop_assert_eq!(first.num_keys(), latest.len());
        for (key, value) in &latest {
            let range = first.get(key).unwrap();
            let bytes = &log[range.offset as usize..range.end() as usize];
            prop_assert_eq!(bytes, value.as_slice());
        }
    }
}
