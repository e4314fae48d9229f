//! Error types for postlog
//!
//! Provides a unified error type for all operations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using PostlogError
pub type Result<T> = std::result::Result<T, PostlogError>;

/// Unified error type for postlog operations
#[derive(Debug, Error)]
pub enum PostlogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{op} failed on {}: {source}", .path.display())]
    Io {
        /// Which call failed ("write", "read", "flush", "sync", ...)
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Record size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Record type has an encoded size of zero bytes")]
    ZeroSizedRecord,

    // -------------------------------------------------------------------------
    // Random Access Errors
    // -------------------------------------------------------------------------
    #[error("Record index {index} out of range ({count} records)")]
    IndexOutOfRange { index: u64, count: u64 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PostlogError {
    /// Build a closure that wraps an `io::Error` with the failing operation and path.
    pub(crate) fn io<'a>(
        op: &'static str,
        path: &'a Path,
    ) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| PostlogError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Error returned by a bulk read that failed partway.
///
/// Carries every record decoded before the failure, in file order.
pub struct PartialRead<R> {
    /// Records successfully decoded before `error` occurred
    pub records: Vec<R>,
    /// The error that stopped the read
    pub error: PostlogError,
}

impl<R> PartialRead<R> {
    pub(crate) fn new(records: Vec<R>, error: PostlogError) -> Self {
        Self { records, error }
    }

    /// Discard the partial records and keep the error.
    pub fn into_error(self) -> PostlogError {
        self.error
    }
}

impl<R> fmt::Debug for PartialRead<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialRead")
            .field("records", &self.records.len())
            .field("error", &self.error)
            .finish()
    }
}

impl<R> fmt::Display for PartialRead<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read stopped after {} records: {}",
            self.records.len(),
            self.error
        )
    }
}

impl<R> std::error::Error for PartialRead<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<R> From<PartialRead<R>> for PostlogError {
    fn from(partial: PartialRead<R>) -> Self {
        partial.error
    }
}
