//! Tests for RadixIndex internals
//!
//! These tests verify:
//! - Node allocation follows shared prefixes
//! - Deletes keep nodes in place
//! - Prefix keys and their extensions coexist

use triekv::index::{ByteRange, KeyIndex, RadixIndex};

#[test]
fn test_new_index_has_only_root() {
    let index = RadixIndex::new();

    assert_eq!(index.node_count(), 1);
    assert_eq!(index.num_keys(), 0);
}

#[test]
fn test_shared_prefix_shares_nodes() {
    let mut index = RadixIndex::new();

    index.set(b"abc", ByteRange::new(1, 1)).unwrap();
    assert_eq!(index.node_count(), 4);

    index.set(b"abd", ByteRange::new(2, 1)).unwrap();
    assert_eq!(index.node_count(), 5);

    index.set(b"ab", ByteRange::new(3, 1)).unwrap();
    assert_eq!(index.node_count(), 5);
    assert_eq!(index.num_keys(), 3);
}

#[test]
fn test_delete_keeps_nodes() {
    let mut index = RadixIndex::new();
    index.set(b"hello", ByteRange::new(1, 5)).unwrap();
    let nodes = index.node_count();

    index.delete(b"hello").unwrap();

    assert_eq!(index.get(b"hello"), None);
    assert_eq!(index.num_keys(), 0);
    assert_eq!(index.node_count(), nodes);
    assert!(index.keys().is_empty());
}

#[test]
fn test_delete_interior_node_key_keeps_descendants() {
    let mut index = RadixIndex::new();
    index.set(b"ab", ByteRange::new(1, 1)).unwrap();
    index.set(b"abcd", ByteRange::new(2, 1)).unwrap();

    index.delete(b"ab").unwrap();

    assert_eq!(index.get(b"ab"), None);
    assert_eq!(index.get(b"abcd"), Some(ByteRange::new(2, 1)));
    assert_eq!(index.keys(), vec![b"abcd".to_vec()]);
}

#[test]
fn test_delete_path_prefix_without_value_is_noop() {
    let mut index = RadixIndex::new();
    index.set(b"abc", ByteRange::new(1, 1)).unwrap();

    index.delete(b"ab").unwrap();
    index.delete(b"abcdef").unwrap();

    assert_eq!(index.num_keys(), 1);
    assert_eq!(index.get(b"abc"), Some(ByteRange::new(1, 1)));
}

#[test]
fn test_overwrite_does_not_allocate() {
    let mut index = RadixIndex::new();
    index.set(b"key", ByteRange::new(1, 1)).unwrap();
    let nodes = index.node_count();

    index.set(b"key", ByteRange::new(9, 9)).unwrap();

    assert_eq!(index.node_count(), nodes);
    assert_eq!(index.num_keys(), 1);
}

#[test]
fn test_walk_preorder_parent_before_children() {
    let mut index = RadixIndex::new();
    for key in ["b", "a", "ab", "aa", "", "ba"] {
        index.set(key.as_bytes(), ByteRange::default()).unwrap();
    }

    let keys: Vec<String> = index
        .keys()
        .into_iter()
        .map(|k| String::from_utf8(k).unwrap())
        .collect();

    assert_eq!(keys, vec!["", "a", "aa", "ab", "b", "ba"]);
}

#[test]
fn test_walk_stop_skips_remaining_siblings() {
    let mut index = RadixIndex::new();
    for key in ["a", "aa", "ab", "b", "c"] {
        index.set(key.as_bytes(), ByteRange::default()).unwrap();
    }

    let mut seen = Vec::new();
    index.walk(&mut |key, _| {
        seen.push(key.to_vec());
        key != b"aa"
    });

    assert_eq!(seen, vec![b"a".to_vec(), b"aa".to_vec()]);
}

#[test]
fn test_full_byte_range_keys() {
    let mut index = RadixIndex::new();
    for byte in 0..=255u8 {
        index.set(&[byte], ByteRange::new(byte as u64, 1)).unwrap();
    }

    assert_eq!(index.num_keys(), 256);
    assert_eq!(index.get(&[0]), Some(ByteRange::new(0, 1)));
    assert_eq!(index.get(&[255]), Some(ByteRange::new(255, 1)));

    let keys = index.keys();
    assert_eq!(keys.first(), Some(&vec![0u8]));
    assert_eq!(keys.last(), Some(&vec![255u8]));
}

#[test]
fn test_max_length_key() {
    let mut index = RadixIndex::new();
    let key = vec![0x42; 255];

    index.set(&key, ByteRange::new(7, 7)).unwrap();

    assert_eq!(index.get(&key), Some(ByteRange::new(7, 7)));
    assert_eq!(index.get(&key[..254]), None);
    assert_eq!(index.node_count(), 256);
}
