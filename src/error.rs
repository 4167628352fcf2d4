//! Error types for triekv
//!
//! Provides a unified error type for all operations.

use std::fmt;

use thiserror::Error;

/// Result type alias using TrieKvError
pub type Result<T> = std::result::Result<T, TrieKvError>;

/// Unified error type for triekv operations
#[derive(Debug, Error)]
pub enum TrieKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Encoding Errors (rejected before any I/O)
    // -------------------------------------------------------------------------
    #[error("key too long: {len} bytes (max {max})")]
    KeyTooLong { len: usize, max: usize },

    #[error("value too long: {len} bytes (max {max})")]
    ValueTooLong { len: usize, max: u64 },

    // -------------------------------------------------------------------------
    // Replay Errors
    // -------------------------------------------------------------------------
    #[error("unknown op {op:#04x} in record at offset {offset}")]
    UnknownOp { op: u8, offset: u64 },

    #[error("truncated record at offset {offset}: {part} needs {expected} bytes, got {got}")]
    TruncatedRecord {
        offset: u64,
        part: RecordPart,
        expected: usize,
        got: usize,
    },

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("index cannot address more nodes (has {nodes})")]
    IndexCapacity { nodes: usize },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// The log file and the index may disagree. The store must be discarded.
    #[error("store poisoned: {0}")]
    Poisoned(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Section of a record that was being read when the stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPart {
    Header,
    Key,
    Value,
}

impl fmt::Display for RecordPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordPart::Header => "header",
            RecordPart::Key => "key",
            RecordPart::Value => "value",
        };
        f.write_str(name)
    }
}

impl TrieKvError {
    /// Whether this error comes from replaying a malformed log
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            TrieKvError::UnknownOp { .. } | TrieKvError::TruncatedRecord { .. }
        )
    }
}
