//! Log Store Module
//!
//! The durable key-value handle that ties the row format, the key index and
//! the log file together.
//!
//! ## Responsibilities
//! - Rebuild the index by replaying the whole log on open
//! - Append rows and update the index as one critical section
//! - Serve reads straight from the file at indexed byte ranges

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, error, trace};

use crate::command::{Command, Response};
use crate::config::{Config, SyncStrategy};
use crate::error::{Result, TrieKvError};
use crate::index::{ByteRange, KeyIndex};

/// An open append-only log file plus its in-memory index
///
/// ## Concurrency Model: Multi-Reader / Single-Writer
///
/// - **Writes** (put/delete/sync): hold the write side of `state`
///   - The file append and the index update happen under the same guard,
///     so no reader ever sees one without the other
///
/// - **Reads** (get/walk/keys): hold the read side of `state`
///   - Any number run concurrently
///   - Values are read positionally from `reader`, which has no shared
///     cursor to contend on
pub struct LogStore {
    /// Store configuration
    config: Config,

    /// Read-only handle used for positional value reads
    reader: File,

    /// Everything mutated by writers
    state: RwLock<StoreState>,
}

struct StoreState {
    /// Key -> value location
    index: Box<dyn KeyIndex>,

    /// Append-only handle on the same file
    writer: File,

    /// Offset the next row will start at
    write_offset: u64,

    /// Set once the file and the index may have diverged
    poisoned: Option<String>,
}

impl StoreState {
    fn check_poisoned(&self) -> Result<()> {
        match &self.poisoned {
            Some(reason) => Err(TrieKvError::Poisoned(reason.clone())),
            None => Ok(()),
        }
    }

    fn poison(&mut self, reason: String) -> TrieKvError {
        error!(write_offset = self.write_offset, "{}", reason);
        self.poisoned = Some(reason.clone());
        TrieKvError::Poisoned(reason)
    }

    /// Append a full row. A failure after the file has grown poisons the
    /// store; a failure that left the file untouched is returned as is.
    fn append(&mut self, row: &[u8]) -> Result<()> {
        let Err(e) = self.writer.write_all(row) else {
            self.write_offset += row.len() as u64;
            return Ok(());
        };

        match self.writer.metadata() {
            Ok(meta) if meta.len() == self.write_offset => Err(e.into()),
            Ok(meta) => Err(self.poison(format!(
                "append of {} bytes failed after file grew to {} bytes: {}",
                row.len(),
                meta.len(),
                e
            ))),
            Err(stat_err) => Err(self.poison(format!(
                "append of {} bytes failed ({}) and file length is unknown: {}",
                row.len(),
                e,
                stat_err
            ))),
        }
    }
}

impl LogStore {
    /// Open or create a log at `path` with the default configuration
    /// (radix index, `P`/`D` op bytes)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open_with(config)
    }

    /// Open or create a log using the index kind named in `config`
    pub fn open_with(config: Config) -> Result<Self> {
        let index = config.index.build();
        Self::open_with_index(config, index)
    }

    /// Open or create a log, replaying it into a caller-supplied index.
    ///
    /// On startup:
    /// 1. Open/create the file (append handle + read handle)
    /// 2. Replay every row into `index`
    /// 3. Next write starts where replay stopped
    ///
    /// Fails without partial recovery if any row is malformed.
    pub fn open_with_index(config: Config, mut index: Box<dyn KeyIndex>) -> Result<Self> {
        config.format.validate()?;
        if index.num_keys() != 0 {
            return Err(TrieKvError::Config(format!(
                "index must be empty before replay (has {} keys)",
                index.num_keys()
            )));
        }

        let path = &config.path;
        let writer = OpenOptions::new().create(true).append(true).open(path)?;
        let reader = File::open(path)?;

        let write_offset = match config.format.extract(&mut BufReader::new(&reader), &mut *index) {
            Ok(consumed) => consumed,
            Err(e) => {
                error!(path = %path.display(), "Refusing to open log: {}", e);
                return Err(e);
            }
        };

        debug!(
            path = %path.display(),
            keys = index.num_keys(),
            bytes = write_offset,
            "Replayed log"
        );

        Ok(Self {
            config,
            reader,
            state: RwLock::new(StoreState {
                index,
                writer,
                write_offset,
                poisoned: None,
            }),
        })
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::Get { key } => Ok(match self.get(&key)? {
                Some(value) => Response::Value(value),
                None => Response::NotFound,
            }),
            Command::Put { key, value } => {
                self.put(&key, &value)?;
                Ok(Response::Ok)
            }
            Command::Delete { key } => {
                self.delete(&key)?;
                Ok(Response::Ok)
            }
            Command::Keys => Ok(Response::Keys(self.keys()?)),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let state = self.state.read();
        state.check_poisoned()?;

        match state.index.get(key) {
            Some(range) => Ok(Some(self.read_range(range)?)),
            None => Ok(None),
        }
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Encode the row (length errors return before any I/O)
    /// 2. Acquire the write lock
    /// 3. Append the row
    /// 4. Point the index at the new value
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let row = self.config.format.encode_put_row(key, value)?;

        let mut state = self.state.write();
        state.check_poisoned()?;

        let range = ByteRange::new(
            self.config.format.value_offset(state.write_offset, key.len()),
            value.len() as u32,
        );
        state.append(&row)?;

        if let Err(e) = state.index.set(key, range) {
            return Err(state.poison(format!("row appended but index set failed: {}", e)));
        }

        trace!(key_len = key.len(), offset = range.offset, width = range.width, "put");
        self.sync_if_required(&state)
    }

    /// Delete a key
    ///
    /// A delete row is appended even when the key is absent.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let row = self.config.format.encode_delete_row(key)?;

        let mut state = self.state.write();
        state.check_poisoned()?;

        state.append(&row)?;

        if let Err(e) = state.index.delete(key) {
            return Err(state.poison(format!("row appended but index delete failed: {}", e)));
        }

        trace!(key_len = key.len(), "delete");
        self.sync_if_required(&state)
    }

    /// Whether `key` has a live entry
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        let state = self.state.read();
        state.check_poisoned()?;
        Ok(state.index.get(key).is_some())
    }

    /// Live keys in index walk order
    pub fn keys(&self) -> Result<Vec<Vec<u8>>> {
        let state = self.state.read();
        state.check_poisoned()?;
        Ok(state.index.keys())
    }

    /// Visit every live key/value pair until `visit` returns false.
    ///
    /// Pairs come in ascending key order when `is_lex_ordered` is true.
    /// The key set is taken under the read lock and values are read after
    /// it is released, so `visit` may call back into the store. Ranges stay
    /// valid because the log is never rewritten. The first read error ends
    /// the walk and is returned.
    pub fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> bool,
    {
        let entries = {
            let state = self.state.read();
            state.check_poisoned()?;

            let mut entries = Vec::with_capacity(state.index.num_keys());
            state.index.walk(&mut |key, range| {
                entries.push((key.to_vec(), range));
                true
            });
            entries
        };

        for (key, range) in entries {
            let value = self.read_range(range)?;
            if !visit(&key, &value) {
                break;
            }
        }
        Ok(())
    }

    /// Force appended rows to disk
    pub fn sync(&self) -> Result<()> {
        let state = self.state.write();
        state.check_poisoned()?;
        state.writer.sync_data()?;
        Ok(())
    }

    fn sync_if_required(&self, state: &StoreState) -> Result<()> {
        if self.config.sync_strategy == SyncStrategy::EveryWrite {
            state.writer.sync_data()?;
        }
        Ok(())
    }

    fn read_range(&self, range: ByteRange) -> Result<Vec<u8>> {
        let mut value = vec![0u8; range.width as usize];
        read_exact_at(&self.reader, &mut value, range.offset)?;
        Ok(value)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live keys
    pub fn num_keys(&self) -> usize {
        self.state.read().index.num_keys()
    }

    /// Whether `keys` and `walk` are in ascending key order
    pub fn is_lex_ordered(&self) -> bool {
        self.state.read().index.is_lex_ordered()
    }

    /// Offset the next row will be written at (equals the log length)
    pub fn write_offset(&self) -> u64 {
        self.state.read().write_offset
    }

    /// Whether a failed write left the store unusable
    pub fn is_poisoned(&self) -> bool {
        self.state.read().poisoned.is_some()
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole buffer",
                ))
            }
            Ok(n) => {
                buf = &mut std::mem::take(&mut buf)[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::io::{Read, Seek, SeekFrom};
    // A private handle keeps the seek cursor away from other readers.
    let mut handle = file.try_clone()?;
    handle.seek(SeekFrom::Start(offset))?;
    handle.read_exact(buf)
}
