use std::collections::VecDeque;

use crate::structs::dialect::Dialect;
use crate::structs::record::Record;
use crate::utils::errors::SplitError;
use crate::utils::record_buffer::{MAX_RECORD_LEN, RecordBuffer};

/// Splits a byte stream into bounded records.
///
/// Bytes may be pushed in chunks of any size, including single bytes. Records
/// end at the terminator byte, which is stripped. For `\n`-terminated input a
/// `\r` directly in front of the terminator is dropped; a `\r` anywhere else
/// is kept. Empty records produce nothing.
///
/// A record longer than the configured limit is never returned: its bytes are
/// discarded up to the next terminator and the iterator yields a single
/// [`SplitError::RecordOverflow`] for it instead.
///
/// # Example
///
/// ```rust
/// use metademux::process::split::Splitter;
/// use metademux::structs::dialect::Dialect;
///
/// let mut splitter = Splitter::for_dialect(Dialect::M3u);
/// splitter.push_bytes(b"first.mp3\r\nsec");
/// splitter.push_bytes(b"ond.mp3");
/// splitter.finish();
///
/// let records: Vec<_> = splitter.filter_map(Result::ok).map(|r| r.data).collect();
/// assert_eq!(records, [b"first.mp3".to_vec(), b"second.mp3".to_vec()]);
/// ```
#[derive(Debug)]
pub struct Splitter {
    pending: VecDeque<u8>,
    buffer: RecordBuffer,
    terminator: u8,
    pending_cr: bool,
    end_of_input: bool,
    flushed: bool,
    record_index: usize,
    overflows: usize,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(b'\n', MAX_RECORD_LEN)
    }
}

impl Splitter {
    /// Creates a splitter for records ending in `terminator`, at most
    /// `max_record_len` bytes long.
    pub fn new(terminator: u8, max_record_len: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            buffer: RecordBuffer::new(max_record_len),
            terminator,
            pending_cr: false,
            end_of_input: false,
            flushed: false,
            record_index: 0,
            overflows: 0,
        }
    }

    /// Splitter using the dialect's terminator and the default record limit.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect.terminator(), MAX_RECORD_LEN)
    }

    /// Queues a chunk of input.
    ///
    /// Queued bytes are only consumed while iterating, so callers should
    /// drain the iterator after each push to keep memory bounded by one chunk
    /// plus one record.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.pending.extend(data);
    }

    /// Marks the end of input. The iterator then flushes a final
    /// unterminated line, if any. Tag-delimited input never flushes a
    /// trailing fragment.
    pub fn finish(&mut self) {
        self.end_of_input = true;
    }

    /// Records seen so far, overflowed ones included.
    pub fn records_seen(&self) -> usize {
        self.record_index
    }

    pub fn overflows(&self) -> usize {
        self.overflows
    }

    fn strips_cr(&self) -> bool {
        self.terminator == b'\n'
    }

    fn push_byte(&mut self, byte: u8) {
        if self.pending_cr {
            self.pending_cr = false;
            self.buffer.push(b'\r');
        }
        if byte == b'\r' && self.strips_cr() {
            self.pending_cr = true;
        } else {
            self.buffer.push(byte);
        }
    }

    fn complete(&mut self) -> Option<Result<Record, SplitError>> {
        let index = self.record_index;

        if self.buffer.is_discarding() {
            self.buffer.reset();
            self.record_index += 1;
            self.overflows += 1;
            return Some(Err(SplitError::RecordOverflow {
                index,
                limit: self.buffer.capacity(),
            }));
        }

        if self.buffer.is_empty() {
            return None;
        }

        self.record_index += 1;
        Some(Ok(Record {
            index,
            data: self.buffer.take(),
        }))
    }

    fn flush(&mut self) -> Option<Result<Record, SplitError>> {
        self.flushed = true;

        if self.pending_cr {
            self.pending_cr = false;
            self.buffer.push(b'\r');
        }

        if !self.strips_cr() && !self.buffer.is_discarding() {
            self.buffer.reset();
            return None;
        }

        self.complete()
    }
}

impl Iterator for Splitter {
    type Item = Result<Record, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(byte) = self.pending.pop_front() {
            if byte != self.terminator {
                self.push_byte(byte);
                continue;
            }

            self.pending_cr = false;
            if let Some(result) = self.complete() {
                return Some(result);
            }
        }

        if self.end_of_input && !self.flushed {
            return self.flush();
        }

        None
    }
}
