/// Default record capacity in bytes.
pub const MAX_RECORD_LEN: usize = 1024;

/// A bounded byte accumulator for one record.
///
/// Length never exceeds the capacity given at construction. Pushing past the
/// capacity drops what was gathered and switches the buffer into discarding
/// mode, in which further pushes are ignored until [`RecordBuffer::reset`].
#[derive(Debug)]
pub struct RecordBuffer {
    data: Vec<u8>,
    capacity: usize,
    discarding: bool,
}

impl RecordBuffer {
    /// Creates an empty buffer holding at most `capacity` bytes.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum record length; must be non-zero
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.min(MAX_RECORD_LEN)),
            capacity,
            discarding: false,
        }
    }

    /// Appends one byte. Returns `false` when the byte was not kept, either
    /// because this push overflowed the buffer or because it was already
    /// discarding.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.discarding {
            return false;
        }
        if self.data.len() == self.capacity {
            self.data.clear();
            self.discarding = true;
            return false;
        }
        self.data.push(byte);
        true
    }

    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hands out the gathered bytes and leaves the buffer empty, ready for
    /// the next record. Clears discarding mode.
    pub fn take(&mut self) -> Vec<u8> {
        self.discarding = false;
        let fresh = Vec::with_capacity(self.capacity.min(MAX_RECORD_LEN));
        std::mem::replace(&mut self.data, fresh)
    }

    /// Drops the gathered bytes and clears discarding mode.
    pub fn reset(&mut self) {
        self.data.clear();
        self.discarding = false;
    }
}

impl Default for RecordBuffer {
    fn default() -> Self {
        Self::new(MAX_RECORD_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_to_capacity_exactly() {
        let mut buffer = RecordBuffer::new(4);
        assert!(b"abcd".iter().all(|&b| buffer.push(b)));
        assert_eq!(buffer.len(), 4);
        assert!(!buffer.is_discarding());
        assert_eq!(buffer.take(), b"abcd");
        assert!(buffer.is_empty());
    }

    #[test]
    fn overflow_discards_until_reset() {
        let mut buffer = RecordBuffer::new(4);
        for &b in b"abcd" {
            buffer.push(b);
        }
        assert!(!buffer.push(b'e'));
        assert!(buffer.is_discarding());
        assert!(buffer.is_empty());
        assert!(!buffer.push(b'f'));
        assert!(buffer.len() <= buffer.capacity());

        buffer.reset();
        assert!(!buffer.is_discarding());
        assert!(buffer.push(b'g'));
        assert_eq!(buffer.take(), b"g");
    }
}
