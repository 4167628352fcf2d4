//! Hash-backed index
//!
//! HashMap keyed by the raw key bytes. No ordering guarantee.

use std::collections::HashMap;

use crate::error::Result;

use super::{ByteRange, KeyIndex};

/// Unordered index with amortized O(1) operations
#[derive(Debug, Default)]
pub struct HashIndex {
    entries: HashMap<Vec<u8>, ByteRange>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyIndex for HashIndex {
    fn set(&mut self, key: &[u8], range: ByteRange) -> Result<()> {
        match self.entries.get_mut(key) {
            Some(existing) => *existing = range,
            None => {
                self.entries.insert(key.to_vec(), range);
            }
        }
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Option<ByteRange> {
        self.entries.get(key).copied()
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
        false
    }
}
