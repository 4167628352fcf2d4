//! Key Index Module
//!
//! Maps each live key to the location of its most recent value in the log.
//!
//! ## Responsibilities
//! - At most one entry per key (set overwrites)
//! - Delete of an absent key is a no-op
//! - Walk over all live entries, optionally in byte-lexicographic order
//!
//! ## Implementations
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────────────┐
//! │ Index        │ set/get/del  │ walk order   │ memory      │
//! ├──────────────┼──────────────┼──────────────┼─────────────┤
//! │ HashIndex    │ O(1) amort.  │ unspecified  │ medium      │
//! │ SortedIndex  │ O(n)         │ ascending    │ minimal     │
//! │ RadixIndex   │ O(key len)   │ ascending    │ high        │
//! └──────────────┴──────────────┴──────────────┴─────────────┘
//! ```
//!
//! The index stores locations, never values.

mod hash;
mod radix;
mod sorted;

use crate::error::Result;

pub use hash::HashIndex;
pub use radix::RadixIndex;
pub use sorted::SortedIndex;

/// Location of a value's bytes within the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteRange {
    /// Absolute file offset of the first value byte
    pub offset: u64,

    /// Number of value bytes
    pub width: u32,
}

impl ByteRange {
    pub fn new(offset: u64, width: u32) -> Self {
        Self { offset, width }
    }

    /// Offset one past the last value byte
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.width)
    }
}

/// Capability set shared by every index implementation.
///
/// Implementations are selected at runtime and used through
/// `Box<dyn KeyIndex>`, so new variants can be added without touching
/// the store.
pub trait KeyIndex: Send + Sync {
    /// Insert or overwrite the entry for `key`
    fn set(&mut self, key: &[u8], range: ByteRange) -> Result<()>;

    /// Remove the entry for `key`. Absent keys are not an error.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    fn get(&self, key: &[u8]) -> Option<ByteRange>;

    /// Visit every live entry until `visit` returns false
    fn walk(&self, visit: &mut dyn FnMut(&[u8], ByteRange) -> bool);

    fn num_keys(&self) -> usize;

    /// Whether `walk` is guaranteed to visit keys in ascending byte order
    fn is_lex_ordered(&self) -> bool;

    /// Collect all keys in walk order
    fn keys(&self) -> Vec<Vec<u8>> {
        let mut keys = Vec::with_capacity(self.num_keys());
        self.walk(&mut |key, _| {
            keys.push(key.to_vec());
            true
        });
        keys
    }
}

/// Index implementation selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// `HashIndex`
    Hash,
    /// `SortedIndex`
    Sorted,
    /// `RadixIndex`
    #[default]
    Radix,
}

impl IndexKind {
    /// Construct a fresh, empty index of this kind
    pub fn build(self) -> Box<dyn KeyIndex> {
        match self {
            IndexKind::Hash => Box::new(HashIndex::new()),
            IndexKind::Sorted => Box::new(SortedIndex::new()),
            IndexKind::Radix => Box::new(RadixIndex::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Hash => "hash",
            IndexKind::Sorted => "sorted",
            IndexKind::Radix => "radix",
        }
    }
}
