//! The upstream side of the demuxer: a byte stream that can be peeked at
//! before it is consumed.

use std::io::{self, ErrorKind, Read};

/// A byte stream supporting a bounded look-ahead.
///
/// Detection peeks at the first bytes without consuming them; parsing then
/// reads the whole stream, peeked bytes included, chunk by chunk.
pub trait ByteSource {
    /// Returns up to `len` bytes from the current position without
    /// consuming them. Fewer bytes are returned only at end of stream.
    fn peek(&mut self, len: usize) -> io::Result<&[u8]>;

    /// Consumes the next chunk into `buf` and returns its length. `0` means
    /// end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Adds peeking to any [`Read`] by holding the peeked bytes until they are
/// read.
#[derive(Debug)]
pub struct PeekReader<R> {
    inner: R,
    peeked: Vec<u8>,
    offset: usize,
}

impl<R: Read> PeekReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: Vec::new(),
            offset: 0,
        }
    }

    fn read_retrying(&mut self, start: usize) -> io::Result<usize> {
        loop {
            match self.inner.read(&mut self.peeked[start..]) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

impl<R: Read> ByteSource for PeekReader<R> {
    fn peek(&mut self, len: usize) -> io::Result<&[u8]> {
        if self.offset > 0 {
            self.peeked.drain(..self.offset);
            self.offset = 0;
        }

        while self.peeked.len() < len {
            let start = self.peeked.len();
            self.peeked.resize(len, 0);
            match self.read_retrying(start) {
                Ok(0) => {
                    self.peeked.truncate(start);
                    break;
                }
                Ok(n) => self.peeked.truncate(start + n),
                Err(e) => {
                    self.peeked.truncate(start);
                    return Err(e);
                }
            }
        }

        let end = len.min(self.peeked.len());
        Ok(&self.peeked[..end])
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let held = &self.peeked[self.offset..];
        if !held.is_empty() {
            let n = held.len().min(buf.len());
            buf[..n].copy_from_slice(&held[..n]);
            self.offset += n;
            if self.offset == self.peeked.len() {
                self.peeked.clear();
                self.offset = 0;
            }
            return Ok(n);
        }

        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn drain(source: &mut impl ByteSource, chunk: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = source.read_chunk(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    #[test]
    fn peek_fills_across_short_reads() -> io::Result<()> {
        let data = b"[playlist]\nFile1=a\n";
        let mut reader = PeekReader::new(Trickle { data, step: 3 });
        assert_eq!(reader.peek(12)?, &data[..12]);
        assert_eq!(reader.peek(4)?, &data[..4]);
        Ok(())
    }

    #[test]
    fn peek_is_short_only_at_end_of_stream() -> io::Result<()> {
        let mut reader = PeekReader::new(&b"short"[..]);
        assert_eq!(reader.peek(1024)?, b"short");
        Ok(())
    }

    #[test]
    fn peeked_bytes_are_replayed() -> io::Result<()> {
        let data = b"0123456789abcdef";
        let mut reader = PeekReader::new(Trickle { data, step: 5 });
        reader.peek(7)?;
        assert_eq!(drain(&mut reader, 4)?, data);
        Ok(())
    }

    #[test]
    fn peek_after_partial_read() -> io::Result<()> {
        let mut reader = PeekReader::new(&b"abcdefgh"[..]);
        reader.peek(4)?;
        let mut buf = [0u8; 2];
        assert_eq!(reader.read_chunk(&mut buf)?, 2);
        assert_eq!(reader.peek(4)?, b"cdef");
        assert_eq!(drain(&mut reader, 3)?, b"cdefgh");
        Ok(())
    }
}
