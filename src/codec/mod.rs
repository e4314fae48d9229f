//! Record Codec Module
//!
//! Encodes one record to exactly `SIZE` bytes and decodes `SIZE` bytes back.
//!
//! ## Responsibilities
//! - Define the fixed-width record contract (`FixedRecord`)
//! - Little-endian encoding for every multi-byte field
//! - Fail fast when a buffer or an implementation disagrees with `SIZE`
//! - Offset arithmetic for random access
//!
//! ## Record Layout
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ Record (SIZE bytes, fields in declaration order) │
//! │ ┌───────────┬───────────┬───────────┬─────────┐ │
//! │ │ Field 1   │ Field 2   │ Field 3   │  ...    │ │
//! │ │ (LE, w1)  │ (LE, w2)  │ (LE, w3)  │         │ │
//! │ └───────────┴───────────┴───────────┴─────────┘ │
//! └─────────────────────────────────────────────────┘
//! SIZE = w1 + w2 + w3 + ...   (no padding, no tags)
//! ```

mod macros;
mod primitives;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{PostlogError, Result};

/// A value with a constant, statically known encoded width.
///
/// Implementations must write exactly `SIZE` bytes in `encode_into` and
/// consume exactly `SIZE` bytes in `decode_from`. Decoding never validates:
/// every `SIZE`-byte pattern maps to some value.
///
/// Structs are usually declared with [`fixed_record!`](crate::fixed_record),
/// which derives `SIZE` from the field types.
pub trait FixedRecord: Sized {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Append the little-endian encoding of `self` to `buf`
    fn encode_into<B: BufMut>(&self, buf: &mut B);

    /// Read one value from the front of `buf`
    ///
    /// `buf` must hold at least `SIZE` bytes.
    fn decode_from<B: Buf>(buf: &mut B) -> Self;
}

/// Encode a record into a fresh buffer of exactly `R::SIZE` bytes
pub fn encode<R: FixedRecord>(record: &R) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(R::SIZE);
    encode_into(record, &mut buf)?;
    Ok(buf.freeze())
}

/// Append the encoding of `record` to `buf`, checking it is exactly `R::SIZE` bytes
pub fn encode_into<R: FixedRecord>(record: &R, buf: &mut BytesMut) -> Result<()> {
    let start = buf.len();
    record.encode_into(buf);

    let written = buf.len() - start;
    if written != R::SIZE {
        buf.truncate(start);
        return Err(PostlogError::SizeMismatch {
            expected: R::SIZE,
            actual: written,
        });
    }
    Ok(())
}

/// Decode one record from a buffer of exactly `R::SIZE` bytes
pub fn decode<R: FixedRecord>(bytes: &[u8]) -> Result<R> {
    if bytes.len() != R::SIZE {
        return Err(PostlogError::SizeMismatch {
            expected: R::SIZE,
            actual: bytes.len(),
        });
    }

    let mut cursor = bytes;
    let record = R::decode_from(&mut cursor);

    // decode_from must consume the whole buffer
    if cursor.has_remaining() {
        return Err(PostlogError::SizeMismatch {
            expected: R::SIZE,
            actual: R::SIZE - cursor.remaining(),
        });
    }
    Ok(record)
}

/// Byte offset of the record at `index`, or `None` if it does not fit in a `u64`
pub fn record_offset<R: FixedRecord>(index: u64) -> Option<u64> {
    index.checked_mul(R::SIZE as u64)
}
