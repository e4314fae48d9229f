//! Record Reader
//!
//! Streams records from a file, one fixed-size chunk at a time.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::codec::{self, FixedRecord};
use crate::config::Config;
use crate::error::{PostlogError, Result};

use super::check_record_size;

/// Reads records sequentially, with O(1) repositioning by index
///
/// ## End-of-data policy
/// - A read that returns 0 bytes at a record boundary is a clean EOF.
/// - A trailing chunk of 1..SIZE-1 bytes is a partial record: it is dropped
///   and the read ends without error. `trailing_bytes()` reports its length.
///
/// The second rule also hides a crash in the middle of an append; check
/// `trailing_bytes()` after EOF to detect it.
pub struct RecordReader<R> {
    path: PathBuf,
    reader: BufReader<File>,
    /// One record's worth of bytes
    buf: Vec<u8>,
    /// File length when opened
    file_len: u64,
    /// Index of the next record to read
    position: u64,
    /// Bytes of a partial record dropped at EOF
    trailing: usize,
    exhausted: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R: FixedRecord> RecordReader<R> {
    /// Open a record file for reading with the default config
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, &Config::default())
    }

    /// Open a record file for reading
    pub fn open_with_config(path: &Path, config: &Config) -> Result<Self> {
        check_record_size::<R>()?;

        let file = File::open(path).map_err(|source| PostlogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_len = file
            .metadata()
            .map_err(PostlogError::io("metadata", path))?
            .len();

        tracing::debug!(
            "Opened {} for reading ({} bytes, record size {})",
            path.display(),
            file_len,
            R::SIZE
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(config.read_buffer_size, file),
            buf: vec![0u8; R::SIZE],
            file_len,
            position: 0,
            trailing: 0,
            exhausted: false,
            _record: PhantomData,
        })
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` at end of data, including when only a partial
    /// record remains.
    pub fn next_record(&mut self) -> Result<Option<R>> {
        if self.exhausted {
            return Ok(None);
        }

        let filled = self
            .fill_record()
            .map_err(PostlogError::io("read", &self.path))?;

        if filled == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        if filled < R::SIZE {
            self.exhausted = true;
            self.trailing = filled;
            tracing::debug!(
                "Dropping partial record at end of {}: {} of {} bytes",
                self.path.display(),
                filled,
                R::SIZE
            );
            return Ok(None);
        }

        let record = codec::decode(&self.buf)?;
        self.position += 1;
        Ok(Some(record))
    }

    /// Fill `buf` with up to one record; returns the number of bytes read.
    /// Stops short only at EOF.
    fn fill_record(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Reposition so the next read returns the record at `index`
    ///
    /// Seeking to `record_count()` is allowed and yields EOF.
    pub fn seek_to(&mut self, index: u64) -> Result<()> {
        let count = self.record_count();
        let offset = codec::record_offset::<R>(index)
            .filter(|_| index <= count)
            .ok_or(PostlogError::IndexOutOfRange { index, count })?;

        self.reader
            .seek(SeekFrom::Start(offset))
            .map_err(PostlogError::io("seek", &self.path))?;
        self.position = index;
        self.trailing = 0;
        self.exhausted = false;
        Ok(())
    }

    /// Number of complete records in the file when it was opened
    pub fn record_count(&self) -> u64 {
        self.file_len / R::SIZE as u64
    }

    /// File length in bytes when it was opened
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Index of the next record to be read
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes of a partial trailing record dropped by the last read (0 if none)
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over the remaining records
    pub fn records(self) -> RecordIter<R> {
        RecordIter {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over records; stops after the first error
pub struct RecordIter<R> {
    reader: RecordReader<R>,
    failed: bool,
}

impl<R: FixedRecord> RecordIter<R> {
    /// Give the underlying reader back (e.g. to inspect `trailing_bytes()`)
    pub fn into_reader(self) -> RecordReader<R> {
        self.reader
    }
}

impl<R: FixedRecord> Iterator for RecordIter<R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
