//! # postlog
//!
//! Fixed-size record files:
//! - Every record of a type encodes to the same number of bytes
//! - Little-endian throughout, no header, no framing
//! - O(1) random access: record `n` starts at `n × SIZE`
//! - Bulk write, streaming/bulk read, and single-record append
//! - Reads tolerate a partial trailing record
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │        write_all / read_all / open_for_append / ...          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Record File (file)                         │
//! │     RecordWriter    │   RecordReader   │   AppendHandle      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one call per record
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Record Codec (codec)                        │
//! │          FixedRecord: SIZE, encode_into, decode_from         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! postlog::fixed_record! {
//!     #[derive(Debug, Clone, Copy, PartialEq)]
//!     pub struct Posting {
//!         pub id: i64,
//!         pub date: i64,
//!         pub amount: i64,
//!     }
//! }
//!
//! # fn main() -> postlog::Result<()> {
//! let postings = [
//!     Posting { id: 1, date: 20240101, amount: 100 },
//!     Posting { id: 2, date: 20240102, amount: 200 },
//! ];
//! postlog::write_all("postings.bin", &postings)?;
//!
//! let mut handle = postlog::open_for_append("postings.bin")?;
//! postlog::append_one(&mut handle, &Posting { id: 3, date: 20240103, amount: 300 })?;
//! postlog::close(handle)?;
//!
//! let all: Vec<Posting> = postlog::read_all("postings.bin")?;
//! assert_eq!(all.len(), 3);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod file;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PartialRead, PostlogError, Result};
pub use config::{Config, SyncStrategy};
pub use codec::FixedRecord;
pub use file::{
    append_one, close, open_for_append, open_for_append_with_config, read_all,
    read_all_with_config, read_at, read_at_with_config, write_all, write_all_with_config,
    AppendHandle, RecordIter, RecordReader, RecordWriter,
};

/// Re-exported for [`fixed_record!`] expansions
pub use bytes;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of postlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
