//! Record File Module
//!
//! Owns the file lifecycle and drives the codec over a stream of records.
//!
//! ## Responsibilities
//! - Bulk write: create/truncate, then write every record in order
//! - Bulk read: decode until end of data, tolerating a partial tail
//! - Append: open in append mode, write one record per call, close explicitly
//! - Random access by record index
//!
//! ## File Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┬──────────┐
//! │ Record 0     │ Record 1     │ Record 2     │ ... │ partial? │
//! │ (SIZE bytes) │ (SIZE bytes) │ (SIZE bytes) │     │ (<SIZE)  │
//! └──────────────┴──────────────┴──────────────┴─────┴──────────┘
//! offset(n) = n × SIZE       no header, footer, length or checksum
//! ```
//!
//! A partial tail can only come from an interrupted append or from bytes
//! written outside this crate; readers drop it without error.
//!
//! Nothing here is atomic. A failed bulk write leaves a partially written
//! file; callers that need all-or-nothing should write to a temporary path
//! and rename it into place.

mod append;
mod reader;
mod sync;
mod writer;

use std::fs::OpenOptions;
use std::path::Path;

use crate::codec::FixedRecord;
use crate::config::Config;
use crate::error::{PartialRead, PostlogError, Result};

pub use append::AppendHandle;
pub use reader::{RecordIter, RecordReader};
pub use writer::RecordWriter;

// =============================================================================
// Bulk Write
// =============================================================================

/// Write `records` to `path`, replacing any existing content.
///
/// Returns the number of records written.
pub fn write_all<R: FixedRecord>(path: impl AsRef<Path>, records: &[R]) -> Result<u64> {
    write_all_with_config(path, records, &Config::default())
}

/// [`write_all`] with an explicit config
pub fn write_all_with_config<R: FixedRecord>(
    path: impl AsRef<Path>,
    records: &[R],
    config: &Config,
) -> Result<u64> {
    let mut writer = RecordWriter::create_with_config(path.as_ref(), config)?;
    writer.write_all(records)?;
    writer.finish()
}

// =============================================================================
// Bulk Read
// =============================================================================

/// Read every complete record from `path`, in file order.
///
/// On failure the error carries the records decoded before it.
pub fn read_all<R: FixedRecord>(
    path: impl AsRef<Path>,
) -> std::result::Result<Vec<R>, PartialRead<R>> {
    read_all_with_config(path, &Config::default())
}

/// [`read_all`] with an explicit config
pub fn read_all_with_config<R: FixedRecord>(
    path: impl AsRef<Path>,
    config: &Config,
) -> std::result::Result<Vec<R>, PartialRead<R>> {
    let mut reader = match RecordReader::open_with_config(path.as_ref(), config) {
        Ok(reader) => reader,
        Err(error) => return Err(PartialRead::new(Vec::new(), error)),
    };

    let mut records = Vec::with_capacity(initial_capacity(reader.record_count()));
    loop {
        match reader.next_record() {
            Ok(Some(record)) => records.push(record),
            Ok(None) => break,
            Err(error) => return Err(PartialRead::new(records, error)),
        }
    }

    tracing::debug!(
        "Read {} records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Read the single record at `index`
pub fn read_at<R: FixedRecord>(path: impl AsRef<Path>, index: u64) -> Result<R> {
    read_at_with_config(path, index, &Config::default())
}

/// [`read_at`] with an explicit config
pub fn read_at_with_config<R: FixedRecord>(
    path: impl AsRef<Path>,
    index: u64,
    config: &Config,
) -> Result<R> {
    let mut reader = RecordReader::open_with_config(path.as_ref(), config)?;
    let count = reader.record_count();
    if index >= count {
        return Err(PostlogError::IndexOutOfRange { index, count });
    }

    reader.seek_to(index)?;
    match reader.next_record()? {
        Some(record) => Ok(record),
        // Only reachable if the file shrank after it was opened
        None => Err(PostlogError::IndexOutOfRange { index, count }),
    }
}

// =============================================================================
// Append
// =============================================================================

/// Open `path` for appending, creating it if absent
pub fn open_for_append<R: FixedRecord>(path: impl AsRef<Path>) -> Result<AppendHandle<R>> {
    AppendHandle::open(path.as_ref())
}

/// [`open_for_append`] with an explicit config
pub fn open_for_append_with_config<R: FixedRecord>(
    path: impl AsRef<Path>,
    config: &Config,
) -> Result<AppendHandle<R>> {
    AppendHandle::open_with_config(path.as_ref(), config)
}

/// Append one record through an open handle
pub fn append_one<R: FixedRecord>(handle: &mut AppendHandle<R>, record: &R) -> Result<()> {
    handle.append(record)
}

/// Close an append handle, flushing anything it buffered
pub fn close<R: FixedRecord>(handle: AppendHandle<R>) -> Result<u64> {
    handle.close()
}

// =============================================================================
// Helpers
// =============================================================================

/// Upper bound on records reserved up front by a bulk read
const MAX_PREALLOC_RECORDS: usize = 64 * 1024;

/// Vec capacity for a bulk read; the file length is only a hint
fn initial_capacity(record_count: u64) -> usize {
    usize::try_from(record_count)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOC_RECORDS)
}

/// Records with no bytes cannot be delimited
pub(crate) fn check_record_size<R: FixedRecord>() -> Result<()> {
    if R::SIZE == 0 {
        return Err(PostlogError::ZeroSizedRecord);
    }
    Ok(())
}

/// `OpenOptions` that create missing files with the configured mode
pub(crate) fn create_options(config: &Config) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(config.file_mode);
    }
    #[cfg(not(unix))]
    let _ = config;

    options
}
