//! Configuration for census-store
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CensusError, Result};

/// Largest accepted displacement budget (the escalation retry doubles it)
pub const MAX_ATTEMPTS_LIMIT: usize = usize::MAX / 2;

/// Main configuration for a registry instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── records.dat      (append-only person records)
    ///     └── index.idx        (persisted cuckoo index)
    pub data_dir: PathBuf,

    /// When to fsync the record file
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Slots per table (the index always has four tables).
    /// Changing this invalidates a persisted index; rebuild after resizing.
    pub table_capacity: u32,

    /// Displacement budget for a single insertion pass.
    /// The one escalation retry uses twice this value.
    pub max_attempts: usize,

    /// Inserts are refused once the load factor reaches this ceiling
    pub max_load_factor: f64,
}

/// Record file sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every append or flag rewrite (safest, slowest)
    EveryWrite,

    /// fsync only on explicit sync/close
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./census_data"),
            sync_strategy: SyncStrategy::EveryWrite,
            table_capacity: 524_287, // prime, ~2M slots in total
            max_attempts: 500,
            max_load_factor: 0.9,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the values that would otherwise fail deep inside the index
    pub fn validate(&self) -> Result<()> {
        if self.table_capacity == 0 {
            return Err(CensusError::Config(
                "table_capacity must be greater than zero".to_string(),
            ));
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(CensusError::Config(format!(
                "max_attempts must be in 1..={}, got {}",
                MAX_ATTEMPTS_LIMIT, self.max_attempts
            )));
        }
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(CensusError::Config(format!(
                "max_load_factor must be in (0, 1], got {}",
                self.max_load_factor
            )));
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
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the record file sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the number of slots per table
    pub fn table_capacity(mut self, capacity: u32) -> Self {
        self.config.table_capacity = capacity;
        self
    }

    /// Set the default displacement budget
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the load-factor ceiling
    pub fn max_load_factor(mut self, ceiling: f64) -> Self {
        self.config.max_load_factor = ceiling;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
