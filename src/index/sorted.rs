//! Sorted-array index
//!
//! A single Vec of (key, range) pairs kept in ascending key order at all
//! times. Every operation is a linear scan; walking is ordered for free.

use crate::error::Result;

use super::{ByteRange, KeyIndex};

/// Ordered index with minimal memory overhead and O(n) operations
#[derive(Debug, Default)]
pub struct SortedIndex {
    entries: Vec<(Vec<u8>, ByteRange)>,
}

impl SortedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `key`, or the position it would be inserted at
    fn position(&self, key: &[u8]) -> std::result::Result<usize, usize> {
        for (i, (existing, _)) in self.entries.iter().enumerate() {
            match existing.as_slice().cmp(key) {
                std::cmp::Ordering::Less => continue,
                std::cmp::Ordering::Equal => return Ok(i),
                std::cmp::Ordering::Greater => return Err(i),
            }
        }
        Err(self.entries.len())
    }
}

impl KeyIndex for SortedIndex {
    fn set(&mut self, key: &[u8], range: ByteRange) -> Result<()> {
        match self.position(key) {
            Ok(i) => self.entries[i].1 = range,
            Err(i) => self.entries.insert(i, (key.to_vec(), range)),
        }
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if let Ok(i) = self.position(key) {
            self.entries.remove(i);
        }
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Option<ByteRange> {
        self.position(key).ok().map(|i| self.entries[i].1)
    }

    fn walk(&self, visit: &mut dyn FnMut(&[u8], ByteRange) -> bool) {
        for (key, range) in &self.entries {
            if !visit(key, *range) {
                return;
            }
        }
    }

    fn num_keys(&self) -> usize {
        self.entries.len()
    }

    fn is_lex_ordered(&self) -> bool {
        true
    }
}
