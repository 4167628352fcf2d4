//! Record Format Module
//!
//! Defines the on-disk row layout and the replay procedure that rebuilds a
//! key index from it.
//!
//! ## Responsibilities
//! - Encode put/delete rows (length-checked before any I/O)
//! - Replay a byte stream into a `KeyIndex`
//! - Own the single formula for where a row's value starts
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Row 1                                                │
//! │ ┌────────┬──────────┬────────────┬───────┬─────────┐ │
//! │ │ Op (1) │ KLen (1) │ VLen (4BE) │  Key  │  Value  │ │
//! │ └────────┴──────────┴────────────┴───────┴─────────┘ │
//! ├──────────────────────────────────────────────────────┤
//! │ Row 2 ...                                            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Delete rows carry `VLen = 0` and no value bytes. There is no file
//! header, footer or checksum: rows are found by following the length
//! fields from offset 0.

mod binary;

use std::fmt::Debug;
use std::io::Read;

use bytes::{Buf, BufMut};

use crate::error::Result;
use crate::index::KeyIndex;

pub use binary::BinaryFormat;

/// A row codec the store can write with and replay from.
///
/// `BinaryFormat` is the only codec shipped. Other layouts plug in through
/// `ConfigBuilder::format`; the store only ever talks to this trait.
pub trait RowFormat: Send + Sync + Debug {
    /// Reject a codec that could not round-trip its own rows
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Encode a put row. Length errors return before anything is written.
    fn encode_put_row(&self, key: &[u8], value: &[u8]) -> Result<Vec<u8>>;

    /// Encode a delete row
    fn encode_delete_row(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Absolute offset of the value of a put row for a key of `key_len`
    /// bytes starting at `row_start`
    fn value_offset(&self, row_start: u64, key_len: usize) -> u64;

    /// Replay every row in `reader` into `index`, returning bytes consumed
    fn extract(&self, reader: &mut dyn Read, index: &mut dyn KeyIndex) -> Result<u64>;
}

/// Header size: Op (1) + KeyLen (1) + ValueLen (4) = 6 bytes
pub const HEADER_SIZE: usize = 6;

/// Largest key a row can carry (u8 length field)
pub const MAX_KEY_LEN: usize = u8::MAX as usize;

/// Largest value a row can carry (u32 length field)
pub const MAX_VALUE_LEN: u64 = u32::MAX as u64;

/// Kind of mutation a row records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Put,
    Delete,
}

/// Decoded fixed-size row header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHeader {
    pub op: u8,
    pub key_len: u8,
    pub value_len: u32,
}

impl RowHeader {
    pub fn encode(&self, out: &mut impl BufMut) {
        out.put_u8(self.op);
        out.put_u8(self.key_len);
        out.put_u32(self.value_len);
    }

    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut buf = &bytes[..];
        Self {
            op: buf.get_u8(),
            key_len: buf.get_u8(),
            value_len: buf.get_u32(),
        }
    }

    /// Total encoded size of the row this header starts
    pub fn row_len(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.key_len) + u64::from(self.value_len)
    }
}

/// Absolute offset of the value of a row starting at `row_start`.
///
/// Both the live write path and replay go through this function so the two
/// can never disagree on where a value lives.
pub fn value_offset(row_start: u64, key_len: usize) -> u64 {
    row_start + HEADER_SIZE as u64 + key_len as u64
}
