//! Tests for the record reader
//!
//! These tests verify:
//! - Reading complete files and empty files
//! - Partial trailing record handling
//! - Random access (seek_to, read_at)
//! - Iterator behavior
//! - Error reporting with partial results

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use postlog::bytes::{Buf, BufMut};
use postlog::{Config, FixedRecord, PostlogError, RecordReader};
use tempfile::TempDir;

postlog::fixed_record! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Posting {
        pub id: i64,
        pub date: i64,
        pub amount: i64,
    }
}

/// Two u32 words; a record whose first word is `TRUNCATED_MARKER` decodes
/// from the first word alone and leaves the second unread.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tagged(u32, u32);

const TRUNCATED_MARKER: u32 = 0xDEAD_BEEF;

impl FixedRecord for Tagged {
    const SIZE: usize = 8;

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.0);
        buf.put_u32_le(self.1);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        let tag = buf.get_u32_le();
        if tag == TRUNCATED_MARKER {
            return Tagged(tag, 0);
        }
        Tagged(tag, buf.get_u32_le())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("postings.bin");
    (temp_dir, path)
}

fn sample_postings(count: i64) -> Vec<Posting> {
    (0..count)
        .map(|i| Posting {
            id: i,
            date: 20240101 + i % 365,
            amount: i * 123,
        })
        .collect()
}

/// Append raw bytes outside the crate, simulating a torn write
fn append_garbage(path: &Path, len: usize) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(&vec![0x5Au8; len]).unwrap();
    file.sync_all().unwrap();
}

// =============================================================================
// Basic Reading Tests
// =============================================================================

#[test]
fn test_read_empty_file() {
    let (_temp, path) = setup_temp_file();
    fs::File::create(&path).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    assert_eq!(reader.record_count(), 0);
    assert!(reader.next_record().unwrap().is_none());

    let records: Vec<Posting> = postlog::read_all(&path).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_read_records_in_order() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(25);
    postlog::write_all(&path, &postings).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    for (i, original) in postings.iter().enumerate() {
        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(&record, original, "Record {} mismatch", i);
        assert_eq!(reader.position(), i as u64 + 1);
    }

    // Should reach EOF and stay there
    assert!(reader.next_record().unwrap().is_none());
    assert!(reader.next_record().unwrap().is_none());
    assert_eq!(reader.trailing_bytes(), 0);
}

#[test]
fn test_read_missing_file() {
    let (_temp, path) = setup_temp_file();

    let partial = postlog::read_all::<Posting>(&path).unwrap_err();

    assert!(partial.records.is_empty());
    assert!(matches!(partial.error, PostlogError::Open { .. }));
}

#[test]
fn test_read_with_tiny_buffer() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(30)).unwrap();
    let config = Config::builder().read_buffer_size(5).build();

    let records: Vec<Posting> = postlog::read_all_with_config(&path, &config).unwrap();

    assert_eq!(records, sample_postings(30));
}

// =============================================================================
// Partial Tail Tests
// =============================================================================

#[test]
fn test_every_partial_tail_length_is_dropped() {
    for extra in 1..24 {
        let (_temp, path) = setup_temp_file();
        let postings = sample_postings(4);
        postlog::write_all(&path, &postings).unwrap();
        append_garbage(&path, extra);

        let records: Vec<Posting> = postlog::read_all(&path)
            .unwrap_or_else(|e| panic!("{} trailing bytes: {}", extra, e));
        assert_eq!(records, postings, "{} trailing bytes", extra);
    }
}

#[test]
fn test_trailing_bytes_reported() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(2)).unwrap();
    append_garbage(&path, 10);

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    assert_eq!(reader.record_count(), 2);
    assert_eq!(reader.file_len(), 58);

    assert!(reader.next_record().unwrap().is_some());
    assert!(reader.next_record().unwrap().is_some());
    assert!(reader.next_record().unwrap().is_none());
    assert_eq!(reader.trailing_bytes(), 10);
}

#[test]
fn test_partial_only_file() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, [1u8; 23]).unwrap();

    let records: Vec<Posting> = postlog::read_all(&path).unwrap();

    assert!(records.is_empty());
}

// =============================================================================
// Random Access Tests
// =============================================================================

#[test]
fn test_seek_to_index() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(10);
    postlog::write_all(&path, &postings).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    reader.seek_to(7).unwrap();
    assert_eq!(reader.next_record().unwrap().unwrap(), postings[7]);

    // Backwards works too
    reader.seek_to(2).unwrap();
    assert_eq!(reader.next_record().unwrap().unwrap(), postings[2]);
    assert_eq!(reader.position(), 3);
}

#[test]
fn test_seek_to_end_then_back() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(3);
    postlog::write_all(&path, &postings).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    reader.seek_to(3).unwrap();
    assert!(reader.next_record().unwrap().is_none());

    reader.seek_to(0).unwrap();
    assert_eq!(reader.next_record().unwrap().unwrap(), postings[0]);
}

#[test]
fn test_seek_past_end() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(3)).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    let err = reader.seek_to(4).unwrap_err();

    assert!(matches!(
        err,
        PostlogError::IndexOutOfRange { index: 4, count: 3 }
    ));
}

#[test]
fn test_read_at() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(100);
    postlog::write_all(&path, &postings).unwrap();

    for index in [0u64, 1, 50, 99] {
        let record: Posting = postlog::read_at(&path, index).unwrap();
        assert_eq!(record, postings[index as usize]);
    }
}

#[test]
fn test_read_at_with_config() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(20);
    postlog::write_all(&path, &postings).unwrap();
    let config = Config::builder().read_buffer_size(7).build();

    let record: Posting = postlog::read_at_with_config(&path, 13, &config).unwrap();
    assert_eq!(record, postings[13]);

    let err = postlog::read_at_with_config::<Posting>(&path, 20, &config).unwrap_err();
    assert!(matches!(
        err,
        PostlogError::IndexOutOfRange { index: 20, count: 20 }
    ));
}

#[test]
fn test_read_at_ignores_partial_tail() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(2)).unwrap();
    append_garbage(&path, 12);

    let err = postlog::read_at::<Posting>(&path, 2).unwrap_err();

    assert!(matches!(
        err,
        PostlogError::IndexOutOfRange { index: 2, count: 2 }
    ));
}

// =============================================================================
// Iterator Tests
// =============================================================================

#[test]
fn test_iterator_yields_all_records() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(12);
    postlog::write_all(&path, &postings).unwrap();

    let reader = RecordReader::<Posting>::open(&path).unwrap();
    let records: Vec<Posting> = reader.records().collect::<postlog::Result<_>>().unwrap();

    assert_eq!(records, postings);
}

#[test]
fn test_iterator_from_middle() {
    let (_temp, path) = setup_temp_file();
    let postings = sample_postings(12);
    postlog::write_all(&path, &postings).unwrap();

    let mut reader = RecordReader::<Posting>::open(&path).unwrap();
    reader.seek_to(9).unwrap();
    let ids: Vec<i64> = reader.records().map(|r| r.unwrap().id).collect();

    assert_eq!(ids, vec![9, 10, 11]);
}

#[test]
fn test_iterator_returns_reader() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(3)).unwrap();
    append_garbage(&path, 5);

    let mut records = RecordReader::<Posting>::open(&path).unwrap().records();
    assert_eq!(records.by_ref().count(), 3);

    let reader = records.into_reader();
    assert_eq!(reader.trailing_bytes(), 5);
}

// =============================================================================
// Error Tests
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_read_error_reports_partial_results() {
    // Opening a directory succeeds on Linux but reading it fails
    let temp = TempDir::new().unwrap();

    let partial = postlog::read_all::<Posting>(temp.path()).unwrap_err();

    assert!(partial.records.is_empty());
    assert!(matches!(
        partial.error,
        PostlogError::Io { op: "read", .. }
    ));

    let err: PostlogError = partial.into();
    assert!(err.to_string().starts_with("read failed on"));
}

#[test]
fn test_decode_error_keeps_earlier_records() {
    let (_temp, path) = setup_temp_file();
    let good = vec![Tagged(1, 10), Tagged(2, 20), Tagged(3, 30)];
    let mut records = good.clone();
    records.push(Tagged(TRUNCATED_MARKER, 40));
    records.push(Tagged(5, 50));
    postlog::write_all(&path, &records).unwrap();

    let partial = postlog::read_all::<Tagged>(&path).unwrap_err();

    assert_eq!(partial.records, good);
    assert!(matches!(
        partial.error,
        PostlogError::SizeMismatch { expected: 8, actual: 4 }
    ));
}

#[test]
fn test_decode_error_stops_iterator() {
    let (_temp, path) = setup_temp_file();
    let records = vec![Tagged(1, 10), Tagged(TRUNCATED_MARKER, 0), Tagged(3, 30)];
    postlog::write_all(&path, &records).unwrap();

    let results: Vec<_> = RecordReader::<Tagged>::open(&path).unwrap().records().collect();

    assert_eq!(results.len(), 2);
    assert_eq!(*results[0].as_ref().unwrap(), Tagged(1, 10));
    assert!(matches!(
        results[1],
        Err(PostlogError::SizeMismatch { expected: 8, actual: 4 })
    ));
}

#[test]
fn test_idempotent_read() {
    let (_temp, path) = setup_temp_file();
    postlog::write_all(&path, &sample_postings(40)).unwrap();
    append_garbage(&path, 3);

    let first: Vec<Posting> = postlog::read_all(&path).unwrap();
    let second: Vec<Posting> = postlog::read_all(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 40);
}
