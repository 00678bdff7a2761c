//! Forward-only, ASCII case-insensitive searches over a record.

/// Returns `true` if `haystack` begins with `needle`, ignoring ASCII case.
#[inline]
pub fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .get(..needle.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(needle))
}

/// A cursor over an immutable record. Each search starts where the previous
/// match began and never moves backwards.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'r> {
    data: &'r [u8],
    pos: usize,
}

impl<'r> Scanner<'r> {
    pub fn new(data: &'r [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from the cursor on.
    pub fn rest(&self) -> &'r [u8] {
        &self.data[self.pos..]
    }

    /// Moves to the next occurrence of `needle`, ignoring ASCII case.
    pub fn seek(&mut self, needle: &[u8]) -> Option<()> {
        self.seek_any(&[needle]).map(|_| ())
    }

    /// Moves to the first position where any of `needles` matches and
    /// returns the index of the matching needle.
    pub fn seek_any(&mut self, needles: &[&[u8]]) -> Option<usize> {
        (self.pos..self.data.len()).find_map(|at| {
            let which = needles
                .iter()
                .position(|needle| starts_with_ignore_case(&self.data[at..], needle))?;
            self.pos = at;
            Some(which)
        })
    }

    /// Moves to the next occurrence of `byte`.
    pub fn seek_byte(&mut self, byte: u8) -> Option<()> {
        let offset = self.rest().iter().position(|&b| b == byte)?;
        self.pos += offset;
        Some(())
    }

    pub fn advance(&mut self, n: usize) -> Option<()> {
        if self.pos + n > self.data.len() {
            return None;
        }
        self.pos += n;
        Some(())
    }

    /// Bytes from the cursor up to, not including, the next `byte`.
    pub fn take_until(&self, byte: u8) -> Option<&'r [u8]> {
        let rest = self.rest();
        let end = rest.iter().position(|&b| b == byte)?;
        Some(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeks_are_anchored_and_forward_only() {
        let mut scanner = Scanner::new(b"<REF HREF=\"mms://x\"");
        assert!(scanner.seek(b"ref").is_some());
        assert_eq!(scanner.position(), 1);
        assert!(scanner.seek(b"href").is_some());
        assert_eq!(scanner.position(), 5);
        assert!(scanner.seek(b"ref").is_some());
        assert_eq!(scanner.position(), 6);
        assert!(scanner.seek(b"<").is_none());
    }

    #[test]
    fn seek_any_reports_first_position_then_needle_order() {
        let mut scanner = Scanner::new(b"xx mmsu://a http://b");
        let needles: [&[u8]; 3] = [b"mms://", b"mmsu://", b"http://"];
        let which = scanner.seek_any(&needles);
        assert_eq!(which, Some(1));
        assert_eq!(scanner.rest(), b"mmsu://a http://b");
    }

    #[test]
    fn take_until_needs_terminator() {
        let scanner = Scanner::new(b"abc\"def");
        assert_eq!(scanner.take_until(b'"'), Some(&b"abc"[..]));
        assert_eq!(scanner.take_until(b'#'), None);
    }

    #[test]
    fn advance_is_bounded() {
        let mut scanner = Scanner::new(b"ab");
        assert!(scanner.advance(2).is_some());
        assert!(scanner.rest().is_empty());
        assert!(scanner.advance(1).is_none());
    }
}
