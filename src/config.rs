//! Configuration for postlog
//!
//! Centralized configuration with sensible defaults.

use crate::error::{PostlogError, Result};

/// Configuration shared by writers, readers and append handles
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Buffering Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the bulk writer's buffer (in bytes)
    pub write_buffer_size: usize,

    /// Capacity of the reader's buffer (in bytes)
    pub read_buffer_size: usize,

    /// Capacity of an append handle's buffer (in bytes).
    /// Zero means every append goes straight to the file.
    pub append_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: when to fsync written records
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Permission bits for newly created files (unix only)
    pub file_mode: u32,
}

/// Sync strategy for writers and append handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Never fsync; rely on the OS to write back
    Never,

    /// fsync once when the writer is finished or the handle is closed
    OnClose,

    /// fsync after N records (and once more on close)
    EveryNRecords { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write_buffer_size: 64 * 1024, // 64 KB
            read_buffer_size: 64 * 1024,  // 64 KB
            append_buffer_size: 0,
            sync_strategy: SyncStrategy::Never,
            file_mode: 0o644,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings that cannot be honored
    pub fn validate(&self) -> Result<()> {
        if let SyncStrategy::EveryNRecords { count: 0 } = self.sync_strategy {
            return Err(PostlogError::Config(
                "EveryNRecords sync strategy needs a count of at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the bulk writer buffer capacity (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// Set the reader buffer capacity (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the append handle buffer capacity (in bytes, 0 = write-through)
    pub fn append_buffer_size(mut self, size: usize) -> Self {
        self.config.append_buffer_size = size;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the permission bits used when a file is created
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
