//! Append Handle
//!
//! Appends single records to the end of an existing (or new) file.

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

/// An open append-mode handle
///
/// ## Lifecycle
/// `open()` → any number of `append()` → `close()`.
/// `close()` consumes the handle, so a closed handle cannot be written to;
/// append again by reopening.
///
/// With the default config every append is written straight to the file.
/// With `append_buffer_size > 0` appends are buffered and `close()` flushes
/// them. Dropping the handle without `close()` makes a best-effort flush and
/// only logs a failure.
pub struct AppendHandle<R> {
    path: PathBuf,
    writer: BufWriter<File>,
    scratch: BytesMut,
    /// Records appended through this handle
    appended: u64,
    sync: SyncTracker,
    _record: PhantomData<fn(&R)>,
}

impl<R: FixedRecord> AppendHandle<R> {
    /// Open (creating if absent) with the default config
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, &Config::default())
    }

    /// Open (creating if absent) in append mode
    pub fn open_with_config(path: &Path, config: &Config) -> Result<Self> {
        check_record_size::<R>()?;
        config.validate()?;

        let file = create_options(config)
            .append(true)
            .open(path)
            .map_err(|source| PostlogError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let existing = file
            .metadata()
            .map_err(PostlogError::io("metadata", path))?
            .len();
        if existing % R::SIZE as u64 != 0 {
            tracing::warn!(
                "Appending to {} whose length {} is not a multiple of the record size {}",
                path.display(),
                existing,
                R::SIZE
            );
        }
        tracing::debug!(
            "Opened {} for append ({} existing bytes)",
            path.display(),
            existing
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(config.append_buffer_size, file),
            scratch: BytesMut::with_capacity(R::SIZE),
            appended: 0,
            sync: SyncTracker::new(config.sync_strategy),
            _record: PhantomData,
        })
    }

    /// Append one record to the end of the file
    pub fn append(&mut self, record: &R) -> Result<()> {
        self.scratch.clear();
        codec::encode_into(record, &mut self.scratch)?;

        self.writer
            .write_all(&self.scratch)
            .map_err(PostlogError::io("write", &self.path))?;
        self.appended += 1;
        tracing::trace!("Appended record #{} to {}", self.appended, self.path.display());

        if self.sync.record_written() {
            self.sync_now()?;
        }
        Ok(())
    }

    /// Flush buffered records and fsync
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

    /// Flush, sync per config and release the file; returns the number of
    /// records appended through this handle
    pub fn close(mut self) -> Result<u64> {
        if self.sync.sync_on_close() {
            self.sync_now()?;
        } else {
            self.writer
                .flush()
                .map_err(PostlogError::io("flush", &self.path))?;
        }

        tracing::debug!(
            "Closed {} after {} appends",
            self.path.display(),
            self.appended
        );
        Ok(self.appended)
    }

    /// Records appended through this handle
    pub fn appended_count(&self) -> u64 {
        self.appended
    }

    /// Records appended since the last fsync
    pub fn uncommitted_count(&self) -> usize {
        self.sync.uncommitted()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R> Drop for AppendHandle<R> {
    fn drop(&mut self) {
        // No-op after close(): the buffer is already empty
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                "Append handle for {} dropped without close; flush failed: {}",
                self.path.display(),
                e
            );
        }
    }
}
