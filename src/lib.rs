//! # triekv
//!
//! An embedded, append-only log-structured key-value store with:
//! - A single append-only log file as the only persistent state
//! - An in-memory index rebuilt by replaying the log on open
//! - Pluggable indexes (hash, sorted array, byte-trie)
//! - Multi-reader/single-writer concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        LogStore                              │
//! │              (RwLock: many readers, one writer)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Format    │          │  KeyIndex   │
//!   │ (encode /   │ replay → │ key → range │
//!   │  extract)   │          └──────┬──────┘
//!   └──────┬──────┘                 │ get
//!          │ append                 ▼
//!          ▼                ┌─────────────┐
//!   ┌─────────────┐  pread  │  value at   │
//!   │  Log file   │ ◄────── │ (off, len)  │
//!   └─────────────┘         └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod index;
pub mod command;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TrieKvError};
pub use config::{Config, SyncStrategy};
pub use format::RowFormat;
pub use index::{ByteRange, IndexKind, KeyIndex};
pub use store::LogStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of triekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
