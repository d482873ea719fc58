//! Store Module
//!
//! Append-only file of fixed-size person records.
//!
//! ## Responsibilities
//! - Append records and hand back their byte offsets
//! - Random-offset reads of a single record
//! - In-place rewrite of the one-byte `active` flag (logical deletion)
//! - Sequential scan for index rebuilds
//! - Repair torn tails left by an interrupted append
//!
//! ## File Format
//! ```text
//! ┌──────────────────┬──────────────────┬─────┬──────────────────┐
//! │ Record 0 (162 B) │ Record 1 (162 B) │ ... │ Record N (162 B) │
//! └──────────────────┴──────────────────┴─────┴──────────────────┘
//! ```
//! No header, no delimiters; offsets are only known through the index.

mod record_store;
mod scan;

pub use record_store::RecordStore;
pub use scan::RecordScan;
