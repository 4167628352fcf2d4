//! Byte-trie index
//!
//! Every node has 256 child slots, one per byte value, and an optional
//! range marking it as the end of a key. Nodes live in a single arena and
//! refer to their children by arena id, so the tree is owned top-down with
//! no back-references.
//!
//! ```text
//!   keys: "a" "ab" "b"
//!
//!            [root]
//!           a/    \b
//!        [n1 *]   [n3 *]
//!          b|
//!        [n2 *]          * = node holds a ByteRange
//! ```
//!
//! Deleting a key clears the range on its terminal node but keeps the
//! nodes themselves, so high key churn grows the arena.

use std::num::NonZeroU32;

use crate::error::{Result, TrieKvError};

use super::{ByteRange, KeyIndex};

/// Arena id of a non-root node. The root is always slot 0.
type NodeId = NonZeroU32;

const ROOT: usize = 0;

struct Node {
    children: [Option<NodeId>; 256],
    range: Option<ByteRange>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [None; 256],
            range: None,
        }
    }
}

/// Ordered index with O(key length) operations
pub struct RadixIndex {
    nodes: Vec<Node>,
    live: usize,
}

impl RadixIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            live: 0,
        }
    }

    /// Number of allocated nodes, including the root and nodes left behind
    /// by deletes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Arena slot of the node at the end of `key`, if the path exists
    fn find(&self, key: &[u8]) -> Option<usize> {
        let mut current = ROOT;
        for &byte in key {
            current = self.nodes[current].children[byte as usize]?.get() as usize;
        }
        Some(current)
    }

    fn alloc(&mut self) -> Result<NodeId> {
        let id = u32::try_from(self.nodes.len())
            .ok()
            .and_then(NodeId::new)
            .ok_or(TrieKvError::IndexCapacity {
                nodes: self.nodes.len(),
            })?;
        self.nodes.push(Node::new());
        Ok(id)
    }

    /// Pre-order walk: a node's own range, then children by ascending byte.
    /// Returns false once `visit` asked to stop.
    fn walk_from(
        &self,
        slot: usize,
        key: &mut Vec<u8>,
        visit: &mut dyn FnMut(&[u8], ByteRange) -> bool,
    ) -> bool {
        let node = &self.nodes[slot];
        if let Some(range) = node.range {
            if !visit(key, range) {
                return false;
            }
        }
        for (byte, child) in node.children.iter().enumerate() {
            let Some(child) = child else { continue };
            key.push(byte as u8);
            let keep_going = self.walk_from(child.get() as usize, key, visit);
            key.pop();
            if !keep_going {
                return false;
            }
        }
        true
    }
}

impl Default for RadixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RadixIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadixIndex")
            .field("nodes", &self.nodes.len())
            .field("live", &self.live)
            .finish()
    }
}

impl KeyIndex for RadixIndex {
    fn set(&mut self, key: &[u8], range: ByteRange) -> Result<()> {
        let mut current = ROOT;
        for &byte in key {
            let next = self.nodes[current].children[byte as usize];
            current = match next {
                Some(child) => child.get() as usize,
                None => {
                    let child = self.alloc()?;
                    self.nodes[current].children[byte as usize] = Some(child);
                    child.get() as usize
                }
            };
        }

        if self.nodes[current].range.replace(range).is_none() {
            self.live += 1;
        }
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if let Some(slot) = self.find(key) {
            if self.nodes[slot].range.take().is_some() {
                self.live -= 1;
            }
        }
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Option<ByteRange> {
        self.find(key).and_then(|slot| self.nodes[slot].range)
    }

    fn walk(&self, visit: &mut dyn FnMut(&[u8], ByteRange) -> bool) {
        let mut key = Vec::new();
        self.walk_from(ROOT, &mut key, visit);
    }

    fn num_keys(&self) -> usize {
        self.live
    }

    fn is_lex_ordered(&self) -> bool {
        true
    }
}
