//! Binary row codec
//!
//! Encodes rows and replays them into an index.

use std::io::{self, ErrorKind, Read};

use crate::error::{RecordPart, Result, TrieKvError};
use crate::index::{ByteRange, KeyIndex};

use super::{
    value_offset, RecordKind, RowFormat, RowHeader, HEADER_SIZE, MAX_KEY_LEN, MAX_VALUE_LEN,
};

/// Row codec parameterized by its two op bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryFormat {
    pub put_op: u8,
    pub delete_op: u8,
}

impl Default for BinaryFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BinaryFormat {
    /// `P` for puts, `D` for deletes
    pub const DEFAULT: BinaryFormat = BinaryFormat {
        put_op: b'P',
        delete_op: b'D',
    };

    pub fn new(put_op: u8, delete_op: u8) -> Result<Self> {
        let format = Self { put_op, delete_op };
        format.validate()?;
        Ok(format)
    }

    /// Reject formats whose op bytes cannot be told apart
    pub fn validate(&self) -> Result<()> {
        if self.put_op == self.delete_op {
            return Err(TrieKvError::Config(format!(
                "put and delete ops must differ (both {:#04x})",
                self.put_op
            )));
        }
        Ok(())
    }

    /// Map an op byte to the record kind it encodes
    pub fn kind(&self, op: u8) -> Option<RecordKind> {
        if op == self.put_op {
            Some(RecordKind::Put)
        } else if op == self.delete_op {
            Some(RecordKind::Delete)
        } else {
            None
        }
    }

    /// Check key and value lengths against the header field widths
    pub fn check_lengths(key_len: usize, value_len: usize) -> Result<()> {
        if key_len > MAX_KEY_LEN {
            return Err(TrieKvError::KeyTooLong {
                len: key_len,
                max: MAX_KEY_LEN,
            });
        }
        if value_len as u64 > MAX_VALUE_LEN {
            return Err(TrieKvError::ValueTooLong {
                len: value_len,
                max: MAX_VALUE_LEN,
            });
        }
        Ok(())
    }

    pub fn encode_put_row(&self, key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
        Self::check_lengths(key.len(), value.len())?;
        Ok(self.encode_row(self.put_op, key, value))
    }

    pub fn encode_delete_row(&self, key: &[u8]) -> Result<Vec<u8>> {
        Self::check_lengths(key.len(), 0)?;
        Ok(self.encode_row(self.delete_op, key, &[]))
    }

    /// Lengths must already be checked
    fn encode_row(&self, op: u8, key: &[u8], value: &[u8]) -> Vec<u8> {
        let header = RowHeader {
            op,
            key_len: key.len() as u8,
            value_len: value.len() as u32,
        };

        let mut row = Vec::with_capacity(HEADER_SIZE + key.len() + value.len());
        header.encode(&mut row);
        row.extend_from_slice(key);
        row.extend_from_slice(value);
        row
    }

    /// Replay every row in `reader` into `index`.
    ///
    /// Returns the number of bytes consumed. The stream must end exactly on
    /// a row boundary; anything else is reported as a truncated record.
    pub fn extract<R: Read>(&self, mut reader: R, index: &mut dyn KeyIndex) -> Result<u64> {
        let mut offset: u64 = 0;

        loop {
            let row_start = offset;

            let mut header_bytes = [0u8; HEADER_SIZE];
            let got = read_full(&mut reader, &mut header_bytes)?;
            if got == 0 {
                break;
            }
            if got < HEADER_SIZE {
                return Err(TrieKvError::TruncatedRecord {
                    offset: row_start,
                    part: RecordPart::Header,
                    expected: HEADER_SIZE,
                    got,
                });
            }

            let header = RowHeader::decode(&header_bytes);
            let kind = self.kind(header.op).ok_or(TrieKvError::UnknownOp {
                op: header.op,
                offset: row_start,
            })?;

            let mut key = vec![0u8; header.key_len as usize];
            let got = read_full(&mut reader, &mut key)?;
            if got < key.len() {
                return Err(TrieKvError::TruncatedRecord {
                    offset: row_start,
                    part: RecordPart::Key,
                    expected: key.len(),
                    got,
                });
            }

            let value_start = value_offset(row_start, key.len());

            // Values are located, not loaded.
            let expected = u64::from(header.value_len);
            let skipped = io::copy(&mut (&mut reader).take(expected), &mut io::sink())?;
            if skipped < expected {
                return Err(TrieKvError::TruncatedRecord {
                    offset: row_start,
                    part: RecordPart::Value,
                    expected: header.value_len as usize,
                    got: skipped as usize,
                });
            }

            offset += header.row_len();

            match kind {
                RecordKind::Delete => index.delete(&key)?,
                RecordKind::Put => {
                    index.set(&key, ByteRange::new(value_start, header.value_len))?;
                }
            }
        }

        Ok(offset)
    }
}

/// Fill `buf` as far as the stream allows, returning the bytes read
impl RowFormat for BinaryFormat {
    fn validate(&self) -> Result<()> {
        BinaryFormat::validate(self)
    }

    fn encode_put_row(&self, key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
        BinaryFormat::encode_put_row(self, key, value)
    }

    fn encode_delete_row(&self, key: &[u8]) -> Result<Vec<u8>> {
        BinaryFormat::encode_delete_row(self, key)
    }

    fn value_offset(&self, row_start: u64, key_len: usize) -> u64 {
        value_offset(row_start, key_len)
    }

    fn extract(&self, reader: &mut dyn Read, index: &mut dyn KeyIndex) -> Result<u64> {
        BinaryFormat::extract(self, reader, index)
    }
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
