//! Record Writer
//!
//! Writes a sequence of records to a new (or truncated) file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bytes::BytesMut;

use crate::codec::{self, FixedRecord};
use crate::config::Config;
use crate::error::{PostlogError, Result};

use super::sync::SyncTracker;
use super::{check_record_size, create_options};

/// Streaming bulk writer
///
/// Creating the writer truncates the target. Records are written in call
/// order with no separators; call `finish()` to flush (and sync, per config).
/// A failed write leaves the file partially written.
pub struct RecordWriter<R> {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Reused encoding buffer
    scratch: BytesMut,
    /// Number of records written
    records_written: u64,
    sync: SyncTracker,
    _record: PhantomData<fn(&R)>,
}

impl<R: FixedRecord> RecordWriter<R> {
    /// Create (or truncate) a file with the default config
    pub fn create(path: &Path) -> Result<Self> {
        Self::create_with_config(path, &Config::default())
    }

    /// Create (or truncate) a file
    pub fn create_with_config(path: &Path, config: &Config) -> Result<Self> {
        check_record_size::<R>()?;
        config.validate()?;

        let file = create_options(config)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| PostlogError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "Created record file {} (record size {} bytes)",
            path.display(),
            R::SIZE
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(config.write_buffer_size, file),
            scratch: BytesMut::with_capacity(R::SIZE),
            records_written: 0,
            sync: SyncTracker::new(config.sync_strategy),
            _record: PhantomData,
        })
    }

    /// Encode and write one record
    pub fn write(&mut self, record: &R) -> Result<()> {
        self.scratch.clear();
        codec::encode_into(record, &mut self.scratch)?;

        self.writer
            .write_all(&self.scratch)
            .map_err(PostlogError::io("write", &self.path))?;
        self.records_written += 1;

        if self.sync.record_written() {
            self.sync_now()?;
        }
        Ok(())
    }

    /// Write every record of `records` in order
    pub fn write_all(&mut self, records: &[R]) -> Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Flush buffered bytes and fsync
    pub fn sync_now(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(PostlogError::io("flush", &self.path))?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(PostlogError::io("sync", &self.path))?;
        self.sync.synced();
        Ok(())
    }

    /// Flush everything and close the file; returns the number of records written
    pub fn finish(mut self) -> Result<u64> {
        if self.sync.sync_on_close() {
            self.sync_now()?;
        } else {
            self.writer
                .flush()
                .map_err(PostlogError::io("flush", &self.path))?;
        }

        tracing::debug!(
            "Finished {}: {} records of {} bytes",
            self.path.display(),
            self.records_written,
            R::SIZE
        );

        Ok(self.records_written)
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Records written since the last fsync
    pub fn uncommitted_count(&self) -> usize {
        self.sync.uncommitted()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
