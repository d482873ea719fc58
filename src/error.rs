//! Error types for census-store
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::intake::ValidationError;

/// Result type alias using CensusError
pub type Result<T> = std::result::Result<T, CensusError>;

/// Unified error type for census-store operations
#[derive(Debug, Error)]
pub enum CensusError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Key {key} is already indexed")]
    DuplicateKey { key: u32 },

    #[error("Key {key} (record offset {offset}) could not be placed within {attempts} displacement attempts")]
    DisplacementExhausted { key: u32, offset: u64, attempts: usize },

    #[error("Load factor {load_factor:.3} has reached the configured ceiling {ceiling:.3}")]
    LoadCeilingReached { load_factor: f64, ceiling: f64 },

    #[error(
        "Index file layout mismatch: expected {expected_tables} tables of {expected_capacity} slots, \
         found {found_tables} tables of {found_capacity} slots"
    )]
    CapacityMismatch {
        expected_tables: u32,
        found_tables: u32,
        expected_capacity: u32,
        found_capacity: u32,
    },

    #[error("Index corruption detected: {0}")]
    CorruptIndex(String),

    // -------------------------------------------------------------------------
    // Record Store Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record at offset {offset}: {reason}")]
    CorruptRecord { offset: u64, reason: String },

    #[error("Offset {offset} does not address a stored record")]
    InvalidOffset { offset: u64 },

    // -------------------------------------------------------------------------
    // Intake Errors
    // -------------------------------------------------------------------------
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for CensusError {
    fn from(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(io) => CensusError::Io(io),
            other => CensusError::Serialization(other.to_string()),
        }
    }
}
