//! # census-store
//!
//! Fixed-format person records on disk, addressed through a four-table
//! cuckoo hash index:
//! - Append-only data file of 162-byte records
//! - Key → offset index with bounded displacement and one escalation retry
//! - Exactly four slot inspections per lookup
//! - Atomic, streamed index persistence independent of the data file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Record Intake                            │
//! │              (field validation → Record)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Registry                                │
//! │       (duplicate check, load ceiling, single lock)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │ append → offset         │ insert(key, offset)
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ RecordStore │          │ CuckooIndex │
//!   │  (append)   │          │ (4 tables)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ save / load
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Index file  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod index;
pub mod store;
pub mod intake;
pub mod registry;
pub mod report;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CensusError, Result};
pub use config::Config;
pub use registry::Registry;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of census-store
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
