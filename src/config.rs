//! Configuration for triekv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::sync::Arc;

use crate::format::{BinaryFormat, RowFormat};
use crate::index::IndexKind;

/// Main configuration for a LogStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the log file. Created on open if it does not exist.
    pub path: PathBuf,

    /// How often the append handle is fsynced
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Which key index implementation to rebuild on open
    pub index: IndexKind,

    // -------------------------------------------------------------------------
    // Format Configuration
    // -------------------------------------------------------------------------
    /// Row codec. Must match the rows already in the file.
    pub format: Arc<dyn RowFormat>,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStrategy {
    /// fsync after every put/delete (safest, slowest)
    EveryWrite,

    /// Leave flushing to the OS; fsync only on `LogStore::sync`
    #[default]
    Manual,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./triekv.log"),
            sync_strategy: SyncStrategy::default(),
            index: IndexKind::default(),
            format: Arc::new(BinaryFormat::DEFAULT),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the index implementation
    pub fn index(mut self, kind: IndexKind) -> Self {
        self.config.index = kind;
        self
    }

    /// Set the row format
    pub fn format(mut self, format: impl RowFormat + 'static) -> Self {
        self.config.format = Arc::new(format);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
